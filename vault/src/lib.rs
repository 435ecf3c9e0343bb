//! Epoch-based deposit and bonus-distribution vault.
//!
//! Each epoch has three phases: subscription (deposits allowed), lock
//! (deposits frozen, vote-recording allowed), and post-lock (withdrawal
//! and bonus claims allowed). Bonuses are split among depositors who voted
//! during the lock phase, proportionally to their deposits.

pub mod epoch;
pub mod error;
pub mod event;
mod math;
pub mod vault;

pub use epoch::{EpochId, EpochState, UserEpochState, UserGlobalState};
pub use error::VaultError;
pub use event::VaultEvent;
pub use vault::IncentiveVault;
