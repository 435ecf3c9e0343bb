use agora_access::AccessError;
use agora_token::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("only the configured governor may record votes")]
    OnlyRegGovernorAllowed,

    #[error("epoch timestamps are invalid or overlap the active epoch")]
    InvalidTimestampForEpoch,

    #[error("bonus funding missing: vault holds {held}, epoch needs {needed}")]
    InsufficientBonusFunding { held: u128, needed: u128 },

    #[error("no epoch is configured")]
    NoActiveEpoch,

    #[error("epoch {0} does not exist")]
    UnknownEpoch(u64),

    #[error("deposits are only accepted during the subscription window")]
    OutOfSubscriptionPeriod,

    #[error("lock period has not ended (ends at {ends}s, now {now}s)")]
    LockPeriodNotEnded { ends: u64, now: u64 },

    #[error("operation unavailable while paused")]
    EnforcedPause,

    #[error("vault is not paused")]
    ExpectedPause,

    #[error("bonus for this epoch was already claimed")]
    BonusAlreadyClaimed,

    #[error("deposit amount must be non-zero")]
    ZeroDeposit,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("snapshot version {0} is not supported")]
    UnsupportedSnapshotVersion(u32),

    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),

    #[error("snapshot encode failed: {0}")]
    SnapshotEncode(String),
}
