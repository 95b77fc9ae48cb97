//! Domain models for the subnet allocator.
//!
//! - [`Ipv4`] - canonical IPv4 CIDR block
//! - [`Vnet`] - virtual network inventory as returned by the Azure CLI

mod ipv4;
mod vnet;

// Re-export public types
pub use ipv4::{cut_addr, get_cidr_mask, num_az_hosts, Ipv4, MAX_LENGTH};
pub use vnet::{AddressSpace, Vnet, VnetSubnet};
