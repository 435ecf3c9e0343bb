//! Epoch and per-user accounting records.

use agora_types::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sequential epoch identifier, starting at 1. Zero means "no epoch yet".
pub type EpochId = u64;

/// Configuration and aggregates of one epoch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpochState {
    pub subscription_start: Timestamp,
    pub subscription_end: Timestamp,
    pub lock_period_end: Timestamp,
    /// Token the bonus is paid in.
    pub bonus_token: Address,
    /// Total bonus distributed across this epoch's eligible depositors.
    pub total_bonus: u128,
    /// Total votes recorded during the lock phase.
    pub total_votes: u64,
    /// Total governance tokens deposited during the subscription phase.
    pub total_deposit: u128,
    /// Sum of deposits of users with at least one recorded vote. The
    /// denominator of the bonus share.
    pub active_weight: u128,
}

impl EpochState {
    /// Whether `now` falls in the deposit window.
    pub fn in_subscription(&self, now: Timestamp) -> bool {
        now >= self.subscription_start && now < self.subscription_end
    }

    /// Whether `now` falls in the lock phase (vote recording allowed).
    pub fn in_lock(&self, now: Timestamp) -> bool {
        now >= self.subscription_end && now < self.lock_period_end
    }

    /// Whether the lock phase is over (withdraw/claim allowed).
    pub fn unlocked(&self, now: Timestamp) -> bool {
        now >= self.lock_period_end
    }
}

/// Per-(user, epoch) state, created lazily on first deposit or vote.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserEpochState {
    /// Total deposited during the subscription phase. Never decremented:
    /// this is the bonus numerator, so withdrawing principal after lock
    /// end must not change it.
    pub deposited: u128,
    /// Principal already paid back out.
    pub withdrawn_amount: u128,
    pub vote_count: u32,
    /// Proposals already counted for this user in this epoch — the
    /// idempotence key for at-least-once vote recording.
    pub recorded_proposals: HashSet<ProposalId>,
    pub withdrawn: bool,
    pub bonus_claimed: bool,
}

impl UserEpochState {
    /// Principal still held by the vault.
    pub fn remaining(&self) -> u128 {
        self.deposited - self.withdrawn_amount
    }
}

/// Per-user state spanning epochs.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UserGlobalState {
    pub last_epoch_participated: EpochId,
    pub total_bonus_claimed: u128,
}
