use agora_access::AccessError;
use agora_ledger::LedgerError;
use agora_timelock::TimelockError;
use agora_types::{Address, ProposalId};
use thiserror::Error;

use crate::proposal::ProposalState;

#[derive(Debug, Error)]
pub enum GovernorError {
    #[error("proposer {0} lacks the proposer capability")]
    InvalidProposerWithRole(Address),

    #[error("proposer {proposer} holds {votes} votes, threshold is {threshold}")]
    InvalidProposerWithVotingPower {
        proposer: Address,
        votes: u128,
        threshold: u128,
    },

    #[error("proposer {0} must hold the proposer capability and meet the voting threshold")]
    InvalidProposerWithRoleAndVotingPower(Address),

    #[error("proposer {0} holds neither the proposer capability nor threshold voting power")]
    InvalidProposerWithRoleOrVotingPower(Address),

    #[error("caller {0} is not the timelock executor")]
    GovernorOnlyExecutor(Address),

    #[error("unknown proposal {0:?}")]
    UnknownProposal(ProposalId),

    #[error("proposal {0:?} already exists")]
    ProposalAlreadyExists(ProposalId),

    #[error("proposal {id:?} is not accepting votes (state {state:?})")]
    VotingNotActive { id: ProposalId, state: ProposalState },

    #[error("{voter} already voted on proposal {id:?}")]
    AlreadyCastVote { id: ProposalId, voter: Address },

    #[error("proposal {id:?} has not succeeded (state {state:?})")]
    ProposalNotSuccessful { id: ProposalId, state: ProposalState },

    #[error("proposal {id:?} is not queued (state {state:?})")]
    ProposalNotQueued { id: ProposalId, state: ProposalState },

    #[error("proposal {0:?} was already executed")]
    ProposalAlreadyExecuted(ProposalId),

    #[error("malformed governor action payload: {0}")]
    InvalidActionPayload(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),

    #[error("unsupported snapshot version {0}")]
    UnsupportedSnapshotVersion(u32),

    #[error("snapshot encode failed: {0}")]
    SnapshotEncode(String),

    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),
}
