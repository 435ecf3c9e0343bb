use agora_access::AccessError;
use agora_types::BatchId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelockError {
    #[error("batch {0} is already scheduled")]
    BatchAlreadyScheduled(BatchId),

    #[error("batch {0} is not scheduled")]
    UnknownBatch(BatchId),

    #[error("batch {id} is not ready: ready at {ready}s, now {now}s")]
    BatchNotReady {
        id: BatchId,
        ready: u64,
        now: u64,
    },

    #[error("batch {0} was already executed")]
    BatchAlreadyExecuted(BatchId),

    #[error("call {index} of batch {id} failed: {reason}")]
    CallFailed {
        id: BatchId,
        index: usize,
        reason: String,
    },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("snapshot version {0} is not supported")]
    UnsupportedSnapshotVersion(u32),

    #[error("snapshot encode failed: {0}")]
    SnapshotEncode(String),

    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),
}
