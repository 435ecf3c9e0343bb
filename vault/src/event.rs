//! Vault domain events.

use crate::epoch::EpochId;
use agora_types::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    SetNewEpoch {
        subscription_start: Timestamp,
        subscription_end: Timestamp,
        lock_period_end: Timestamp,
        bonus_token: Address,
        total_bonus: u128,
        epoch: EpochId,
    },
    Deposit {
        user: Address,
        amount: u128,
        epoch: EpochId,
    },
    RecordVote {
        user: Address,
        proposal_id: ProposalId,
        epoch: EpochId,
    },
    /// Emitted for every withdraw call after lock end, including the
    /// zero-amount replays after a full withdrawal.
    Withdraw {
        user: Address,
        amount: u128,
        epoch: EpochId,
    },
    ClaimBonus {
        user: Address,
        amount: u128,
        epoch: EpochId,
    },
    Paused,
    Unpaused,
    SetRegGovernor {
        governor: Address,
    },
    SetRegToken {
        token: Address,
    },
}
