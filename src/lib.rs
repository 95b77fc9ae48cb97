//! Propose the next free subnet CIDR inside an Azure virtual network.
//!
//! The [`allocation`] engine is pure: it takes address space prefixes and the
//! blocks already in use and returns the lowest free block of the requested
//! size. Around it, [`azure`] finds the VNet, [`processing`] validates the
//! request and [`output`] renders the JSON response.

pub mod allocation;
pub mod azure;
pub mod config;
mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use allocation::{find_available_across_prefixes, find_first_available, partition};
pub use error::{Error, Result};
pub use processing::{propose_subnet, ProposalRequest};
