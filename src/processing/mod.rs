//! Request processing.
//!
//! - [`propose`] - turns a proposal request into a response, logging along the way

mod propose;

pub use propose::{propose_subnet, ProposalRequest};
