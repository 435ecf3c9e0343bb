use agora_types::{Address, BatchId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::proposal::{ProposerMode, VoteSupport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        snapshot: Timestamp,
        deadline: Timestamp,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: VoteSupport,
        weight: u128,
    },
    ProposalQueued {
        id: ProposalId,
        batch: BatchId,
        ready: Timestamp,
    },
    ProposalExecuted {
        id: ProposalId,
        at: Timestamp,
    },
    ProposalCanceled {
        id: ProposalId,
    },
    ProposerModeChanged {
        old: ProposerMode,
        new: ProposerMode,
    },
    IncentiveEnabledChanged {
        enabled: bool,
    },
    IncentiveVaultChanged {
        vault: Address,
    },
    ProposalThresholdChanged {
        old: u128,
        new: u128,
    },
}
