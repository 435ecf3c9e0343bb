//! Historical balance checkpoints.
//!
//! Each account keeps an append-only list of (timestamp, balance) pairs
//! ordered by strictly increasing timestamp. Point-in-time vote weight is
//! a binary search for the latest checkpoint at or before the queried
//! instant.

use agora_types::Timestamp;
use serde::{Deserialize, Serialize};

/// One timestamped balance record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at: Timestamp,
    pub balance: u128,
}

/// Append-only checkpoint sequence for a single account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckpointHistory {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `balance` at `at`.
    ///
    /// Timestamps are strictly increasing: writing at the timestamp of the
    /// last checkpoint overwrites that checkpoint's value instead of
    /// appending a duplicate instant.
    pub fn push(&mut self, at: Timestamp, balance: u128) {
        match self.checkpoints.last_mut() {
            Some(last) if last.at == at => last.balance = balance,
            Some(last) => {
                debug_assert!(last.at < at, "checkpoint timestamps must increase");
                self.checkpoints.push(Checkpoint { at, balance });
            }
            None => self.checkpoints.push(Checkpoint { at, balance }),
        }
    }

    /// Balance recorded by the latest checkpoint with timestamp ≤ `at`,
    /// or zero if no checkpoint existed yet.
    pub fn balance_at(&self, at: Timestamp) -> u128 {
        let idx = self.checkpoints.partition_point(|c| c.at <= at);
        if idx == 0 {
            0
        } else {
            self.checkpoints[idx - 1].balance
        }
    }

    /// Balance recorded by the latest checkpoint, or zero.
    pub fn latest(&self) -> u128 {
        self.checkpoints.last().map(|c| c.balance).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn test_lookup_before_first_checkpoint_is_zero() {
        let mut history = CheckpointHistory::new();
        history.push(ts(100), 50);
        assert_eq!(history.balance_at(ts(99)), 0);
        assert_eq!(history.balance_at(ts(100)), 50);
        assert_eq!(history.balance_at(ts(500)), 50);
    }

    #[test]
    fn test_lookup_picks_latest_at_or_before() {
        let mut history = CheckpointHistory::new();
        history.push(ts(100), 10);
        history.push(ts(200), 20);
        history.push(ts(300), 30);
        assert_eq!(history.balance_at(ts(150)), 10);
        assert_eq!(history.balance_at(ts(200)), 20);
        assert_eq!(history.balance_at(ts(299)), 20);
        assert_eq!(history.balance_at(ts(300)), 30);
    }

    #[test]
    fn test_same_timestamp_overwrites() {
        let mut history = CheckpointHistory::new();
        history.push(ts(100), 10);
        history.push(ts(100), 25);
        assert_eq!(history.len(), 1);
        assert_eq!(history.balance_at(ts(100)), 25);
    }
}
