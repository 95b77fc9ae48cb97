//! Output formatting for proposals.
//!
//! - [`response`] - JSON bodies and status codes

mod response;

pub use response::{ErrorResponse, ProposalResponse, ProposedSubnetResponse};
