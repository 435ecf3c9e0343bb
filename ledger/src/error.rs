use agora_access::AccessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("voting power can only be delegated to self")]
    DelegateToOtherNotAllowed,

    #[error("lookup timestamp {queried}s is not in the past (now {now}s)")]
    FutureLookup { queried: u64, now: u64 },

    #[error("total supply arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("snapshot version {0} is not supported")]
    UnsupportedSnapshotVersion(u32),

    #[error("snapshot encode failed: {0}")]
    SnapshotEncode(String),

    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),
}
