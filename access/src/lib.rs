//! Capability-based authorization for the Agora governance core.
//!
//! Access control is an explicit map from capability tag to the set of
//! identities holding it, queried through a single `has`/`require` helper.
//! Each component owns its own registry; nothing is inherited.

pub mod error;
pub mod registry;

pub use error::AccessError;
pub use registry::{AccessRegistry, Capability};
