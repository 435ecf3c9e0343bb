//! Time-delayed, role-gated execution queue.
//!
//! Approved action batches are scheduled with a minimum delay and can only
//! be executed once their ready timestamp has passed, by a holder of the
//! executor capability, exactly once. Call payloads stay opaque: the
//! executor hands them to a `CallDispatcher` in order and aborts the batch
//! on the first failure.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod executor;

pub use dispatch::{CallDispatcher, DispatchError};
pub use error::TimelockError;
pub use event::TimelockEvent;
pub use executor::TimelockExecutor;
