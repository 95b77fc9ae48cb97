//! Azure CLI interaction.
//!
//! - [`cli`] - Command execution for the Azure CLI
//! - [`cache`] - Dated cache of VNet listings
//! - [`directory`] - VNet lookup used by the presentation layer

mod cache;
mod cli;
mod directory;

// Re-export public types and functions
pub use cache::read_vnet_cache;
pub use cli::run;
pub use directory::{AzCliDirectory, StaticDirectory, VnetDirectory};
