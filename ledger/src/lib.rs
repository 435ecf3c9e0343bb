//! Non-transferable voting-power ledger.
//!
//! Balances change only through the registrar's absolute-value set
//! operation; every change appends a timestamped checkpoint so vote weight
//! can be read at any past instant. Delegation exists for interface
//! compatibility but only ever points at the account itself.

pub mod checkpoint;
pub mod error;
pub mod event;
pub mod ledger;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::LedgerError;
pub use event::LedgerEvent;
pub use ledger::{BalanceEntry, VotingPowerLedger};
