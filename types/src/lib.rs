//! Fundamental types for the Agora governance core.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, timestamps, call batches, and the hash-derived
//! identifiers for proposals and execution batches.

pub mod address;
pub mod call;
pub mod hash;
pub mod time;

pub use address::Address;
pub use call::Call;
pub use hash::{hash_batch, hash_description, hash_proposal, BatchId, ProposalId};
pub use time::Timestamp;
