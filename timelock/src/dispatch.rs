//! The seam between the executor and the targets it calls.

use agora_types::Call;
use thiserror::Error;

/// A failed target call.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Routes one opaque call to its target.
///
/// The host execution environment implements this; in tests a dispatcher
/// typically routes calls to in-memory engines or a token ledger. The
/// executor never interprets payloads itself.
pub trait CallDispatcher {
    fn dispatch(&mut self, call: &Call) -> Result<(), DispatchError>;
}
