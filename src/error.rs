//! Error kinds reported by the allocation engine and its collaborators.

use crate::models::Ipv4;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate can report.
///
/// Running out of candidates is not an error: the engine returns `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested prefix length outside 0..=32.
    #[error("Invalid prefix length {0}, must be between 0 and 32")]
    InvalidPrefixLength(i64),

    /// Requested block is bigger than the parent it should be carved from.
    #[error("Requested /{requested} does not fit inside {parent}")]
    PrefixTooLarge { requested: u8, parent: Ipv4 },

    /// Malformed or non-canonical CIDR text.
    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    /// A required request field is missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Virtual network {vnet_name} not found in resource group {resource_group}")]
    NetworkNotFound {
        resource_group: String,
        vnet_name: String,
    },

    /// The directory lookup could not produce an inventory.
    #[error("Lookup failed: {0}")]
    Lookup(String),
}

impl Error {
    /// HTTP style status the presentation layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidPrefixLength(_)
            | Error::PrefixTooLarge { .. }
            | Error::InvalidCidr(_)
            | Error::InvalidInput(_) => 400,
            Error::NetworkNotFound { .. } => 404,
            Error::Lookup(_) => 500,
        }
    }
}
