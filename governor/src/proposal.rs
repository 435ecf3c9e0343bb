use std::collections::HashSet;

use agora_types::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Policy deciding who may open a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposerMode {
    /// Caller must hold the `Proposer` capability.
    RoleOnly,
    /// Caller's current voting power must reach the proposal threshold.
    VotingPowerOnly,
    /// Both the capability and the threshold are required.
    RoleAndVotingPower,
    /// Either the capability or the threshold suffices.
    RoleOrVotingPower,
}

/// Lifecycle state, derived from the record and the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Active,
    Defeated,
    Succeeded,
    Queued,
    Executed,
    Canceled,
}

/// Ballot choice for a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteSupport {
    Against,
    For,
    Abstain,
}

/// Everything the governor keeps per proposal. Tallies accumulate during
/// the active window; the three flags pin the terminal states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub proposer: Address,
    pub description_hash: [u8; 32],
    pub created_at: Timestamp,
    /// Voting power is read at this timestamp; voting opens just after it.
    pub snapshot: Timestamp,
    /// Last timestamp at which a vote is accepted.
    pub deadline: Timestamp,
    pub against_votes: u128,
    pub for_votes: u128,
    pub abstain_votes: u128,
    pub voters: HashSet<Address>,
    pub queued: bool,
    pub executed: bool,
    pub canceled: bool,
}

impl ProposalRecord {
    pub fn has_voted(&self, account: &Address) -> bool {
        self.voters.contains(account)
    }
}
