//! Proposal governor: proposal creation, voting, and handoff to the
//! timelock executor.
//!
//! A proposal is identified by the hash of its call batch together with
//! the hash of its description. The governor derives proposal state on
//! demand from recorded timestamps and tallies rather than storing a
//! state machine, so `now` is threaded through every read.

mod action;
mod error;
mod event;
mod governor;
mod proposal;

pub use action::GovernorAction;
pub use error::GovernorError;
pub use event::GovernorEvent;
pub use governor::{GovernorConfig, ProposalGovernor};
pub use proposal::{ProposalRecord, ProposalState, ProposerMode, VoteSupport};
