//! Timelock domain events.

use agora_types::{BatchId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockEvent {
    BatchScheduled { id: BatchId, ready: Timestamp },
    BatchExecuted { id: BatchId, at: Timestamp },
    BatchCanceled { id: BatchId },
    MinDelayChanged { old: u64, new: u64 },
}
