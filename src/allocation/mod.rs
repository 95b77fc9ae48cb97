//! Subnet allocation engine.
//!
//! Pure functions that propose the next free block for a virtual network:
//! - [`partition`] - split a parent block into equal sized candidates
//! - [`find_first_available`] - first-fit search inside one parent block
//! - [`find_available_across_prefixes`] - first-fit over every address space prefix
//! - [`find_available_with_prefix`] - the same, also naming the prefix used
//!
//! Nothing here performs I/O or logs. A proposal is computed from the
//! inventory snapshot it is handed and reserves nothing, so two callers can
//! receive the same block; whoever creates the subnet must still check for
//! conflicts at creation time.

mod first_fit;
mod partition;

pub use first_fit::{
    find_available_across_prefixes, find_available_with_prefix, find_first_available,
};
pub use partition::{partition, validate_prefix_length, Subnets};
