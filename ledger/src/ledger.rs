//! The voting-power ledger engine.

use crate::checkpoint::CheckpointHistory;
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use agora_access::{AccessRegistry, Capability};
use agora_events::EventLog;
use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// One registrar entry: set `account`'s balance to the absolute value
/// `new_balance`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: Address,
    pub new_balance: u128,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AccountRecord {
    balance: u128,
    history: CheckpointHistory,
}

/// Non-transferable voting-power ledger with self-only delegation and
/// historical checkpointing.
///
/// The registrar (holder of `Capability::Register`) is the only writer of
/// balances; peer-to-peer transfer calls are accepted but neutralized.
#[derive(Debug)]
pub struct VotingPowerLedger {
    accounts: HashMap<Address, AccountRecord>,
    total_supply: u128,
    roles: AccessRegistry,
    events: EventLog<LedgerEvent>,
}

impl VotingPowerLedger {
    /// Create a ledger administered by `admin`, with `registrar` holding
    /// the register capability.
    pub fn new(admin: Address, registrar: Address) -> Self {
        let mut roles = AccessRegistry::new();
        // A fresh registry always accepts its first bootstrap.
        roles
            .bootstrap(admin)
            .expect("fresh registry bootstraps once");
        roles
            .grant(admin, Capability::Register, registrar)
            .expect("admin was just bootstrapped");
        Self {
            accounts: HashMap::new(),
            total_supply: 0,
            roles,
            events: EventLog::new(),
        }
    }

    /// Set each listed account's balance to the given absolute value.
    ///
    /// Restricted to the register capability. Positive deltas mint,
    /// negative deltas burn, and either appends a checkpoint at `now`.
    /// No-op entries succeed without a balance-changed effect. The whole
    /// call is atomic: the capability check happens before any mutation,
    /// and per-account writes are independent of each other.
    pub fn register_voting_power(
        &mut self,
        caller: Address,
        entries: &[BalanceEntry],
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.roles.require(caller, Capability::Register)?;
        for entry in entries {
            self.set_balance(entry.account, entry.new_balance, now)?;
        }
        Ok(())
    }

    fn set_balance(
        &mut self,
        account: Address,
        new_balance: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let record = self.accounts.entry(account).or_default();
        let old_balance = record.balance;
        if new_balance == old_balance {
            return Ok(());
        }
        if new_balance > old_balance {
            let minted = new_balance - old_balance;
            self.total_supply = self
                .total_supply
                .checked_add(minted)
                .ok_or(LedgerError::Overflow)?;
            record.balance = new_balance;
            record.history.push(now, new_balance);
            self.events.append(LedgerEvent::VotingPowerMinted {
                account,
                amount: minted,
                at: now,
            });
            info!(%account, minted, new_balance, "voting power registered");
        } else {
            let burned = old_balance - new_balance;
            self.total_supply = self
                .total_supply
                .checked_sub(burned)
                .ok_or(LedgerError::Overflow)?;
            record.balance = new_balance;
            record.history.push(now, new_balance);
            self.events.append(LedgerEvent::VotingPowerBurned {
                account,
                amount: burned,
                at: now,
            });
            info!(%account, burned, new_balance, "voting power registered");
        }
        Ok(())
    }

    /// Current voting power of `account`.
    pub fn get_votes(&self, account: Address) -> u128 {
        self.accounts
            .get(&account)
            .map(|r| r.balance)
            .unwrap_or(0)
    }

    /// Voting power of `account` at `timestamp`, read from the checkpoint
    /// history. The queried instant must be strictly in the past.
    pub fn get_past_votes(
        &self,
        account: Address,
        timestamp: Timestamp,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        if timestamp >= now {
            return Err(LedgerError::FutureLookup {
                queried: timestamp.as_secs(),
                now: now.as_secs(),
            });
        }
        Ok(self
            .accounts
            .get(&account)
            .map(|r| r.history.balance_at(timestamp))
            .unwrap_or(0))
    }

    /// Every account delegates to itself, always.
    pub fn delegates(&self, account: Address) -> Address {
        account
    }

    /// Delegate voting power. Only self-delegation is permitted; it is
    /// idempotent and does not touch balances.
    pub fn delegate(&mut self, caller: Address, target: Address) -> Result<(), LedgerError> {
        if target != caller {
            return Err(LedgerError::DelegateToOtherNotAllowed);
        }
        self.events.append(LedgerEvent::DelegateChanged {
            delegator: caller,
            delegate: caller,
        });
        Ok(())
    }

    /// Transfer surface, present for interface compatibility only. The
    /// call succeeds and balances stay unchanged.
    pub fn transfer(&mut self, _caller: Address, _to: Address, _amount: u128) {}

    /// Approval surface, neutralized like `transfer`.
    pub fn approve(&mut self, _caller: Address, _spender: Address, _amount: u128) {}

    /// Allowances are never granted; this always reads zero.
    pub fn allowance(&self, _owner: Address, _spender: Address) -> u128 {
        0
    }

    /// `transfer_from` surface, neutralized like `transfer`.
    pub fn transfer_from(
        &mut self,
        _caller: Address,
        _from: Address,
        _to: Address,
        _amount: u128,
    ) {
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn roles(&self) -> &AccessRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut AccessRegistry {
        &mut self.roles
    }

    pub fn events(&self) -> &EventLog<LedgerEvent> {
        &self.events
    }
}

/// Snapshot schema version. Bump on layout change and add an explicit
/// migration in `load_state`.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LedgerSnapshot {
    version: u32,
    accounts: HashMap<Address, AccountRecord>,
    total_supply: u128,
    roles: AccessRegistry,
}

impl VotingPowerLedger {
    /// Serialize the ledger state (balances, checkpoints, roles) to bytes.
    pub fn save_state(&self) -> Result<Vec<u8>, LedgerError> {
        let snapshot = LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            accounts: self.accounts.clone(),
            total_supply: self.total_supply,
            roles: self.roles.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| LedgerError::SnapshotEncode(e.to_string()))
    }

    /// Restore a ledger from serialized bytes. Unknown schema versions are
    /// rejected; migrations are explicit transforms added here.
    pub fn load_state(data: &[u8]) -> Result<Self, LedgerError> {
        let snapshot: LedgerSnapshot =
            bincode::deserialize(data).map_err(|e| LedgerError::SnapshotDecode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::UnsupportedSnapshotVersion(snapshot.version));
        }
        Ok(Self {
            accounts: snapshot.accounts,
            total_supply: snapshot.total_supply,
            roles: snapshot.roles,
            events: EventLog::new(),
        })
    }
}
