//! Ledger domain events.

use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// One event per balance-changing effect, in call order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// The registrar raised an account's balance by `amount`.
    VotingPowerMinted {
        account: Address,
        amount: u128,
        at: Timestamp,
    },
    /// The registrar lowered an account's balance by `amount`.
    VotingPowerBurned {
        account: Address,
        amount: u128,
        at: Timestamp,
    },
    /// An account (re-)delegated to itself.
    DelegateChanged {
        delegator: Address,
        delegate: Address,
    },
}
