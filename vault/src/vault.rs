//! The incentive vault engine.

use crate::epoch::{EpochId, EpochState, UserEpochState, UserGlobalState};
use crate::error::VaultError;
use crate::event::VaultEvent;
use agora_access::{AccessRegistry, Capability};
use agora_events::EventLog;
use agora_token::TokenLedger;
use agora_types::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Epoch-scoped deposit/lock/bonus engine, driven by governor
/// vote-recording callbacks.
///
/// The vault exclusively owns all epoch and user-epoch records. Token
/// custody lives under the vault's own address in the external token
/// ledger.
pub struct IncentiveVault {
    /// Custody address of the vault in the token ledger.
    address: Address,
    /// The governor allowed to call `record_vote`.
    governor: Address,
    /// The governance token accepted for deposits.
    reg_token: Address,
    current_epoch: EpochId,
    epochs: HashMap<EpochId, EpochState>,
    user_epochs: HashMap<(Address, EpochId), UserEpochState>,
    user_globals: HashMap<Address, UserGlobalState>,
    paused: bool,
    roles: AccessRegistry,
    events: EventLog<VaultEvent>,
}

impl IncentiveVault {
    pub fn new(
        address: Address,
        governor: Address,
        reg_token: Address,
        admin: Address,
        pauser: Address,
    ) -> Self {
        let mut roles = AccessRegistry::new();
        roles
            .bootstrap(admin)
            .expect("fresh registry bootstraps once");
        roles
            .grant(admin, Capability::Pauser, pauser)
            .expect("admin was just bootstrapped");
        Self {
            address,
            governor,
            reg_token,
            current_epoch: 0,
            epochs: HashMap::new(),
            user_epochs: HashMap::new(),
            user_globals: HashMap::new(),
            paused: false,
            roles,
            events: EventLog::new(),
        }
    }

    // ── Configuration ────────────────────────────────────────────────────

    /// Point vote recording at a new governor address. Admin-gated.
    pub fn set_governor(&mut self, caller: Address, governor: Address) -> Result<(), VaultError> {
        self.roles.require(caller, Capability::Admin)?;
        self.governor = governor;
        self.events.append(VaultEvent::SetRegGovernor { governor });
        Ok(())
    }

    /// Change the deposit token. Admin-gated; intended only between epochs.
    pub fn set_reg_token(&mut self, caller: Address, token: Address) -> Result<(), VaultError> {
        self.roles.require(caller, Capability::Admin)?;
        self.reg_token = token;
        self.events.append(VaultEvent::SetRegToken { token });
        Ok(())
    }

    /// Open the next epoch.
    ///
    /// Requires `now < subscription_start < subscription_end <
    /// lock_period_end` and, when an epoch is already configured, that its
    /// lock period has ended — epochs never overlap. Bonus funds must
    /// already sit in vault custody.
    #[allow(clippy::too_many_arguments)]
    pub fn set_new_epoch(
        &mut self,
        caller: Address,
        subscription_start: Timestamp,
        subscription_end: Timestamp,
        lock_period_end: Timestamp,
        bonus_token: Address,
        total_bonus: u128,
        now: Timestamp,
        tokens: &TokenLedger,
    ) -> Result<EpochId, VaultError> {
        self.roles.require(caller, Capability::Admin)?;
        if now >= subscription_start
            || subscription_start >= subscription_end
            || subscription_end >= lock_period_end
        {
            return Err(VaultError::InvalidTimestampForEpoch);
        }
        if let Some(current) = self.epochs.get(&self.current_epoch) {
            if !current.unlocked(now) {
                return Err(VaultError::InvalidTimestampForEpoch);
            }
        }
        let held = tokens.balance_of(bonus_token, self.address);
        if held < total_bonus {
            return Err(VaultError::InsufficientBonusFunding {
                held,
                needed: total_bonus,
            });
        }
        self.current_epoch += 1;
        let epoch = self.current_epoch;
        self.epochs.insert(epoch, EpochState {
            subscription_start,
            subscription_end,
            lock_period_end,
            bonus_token,
            total_bonus,
            total_votes: 0,
            total_deposit: 0,
            active_weight: 0,
        });
        self.events.append(VaultEvent::SetNewEpoch {
            subscription_start,
            subscription_end,
            lock_period_end,
            bonus_token,
            total_bonus,
            epoch,
        });
        info!(epoch, %subscription_start, %subscription_end, %lock_period_end, "new epoch configured");
        Ok(epoch)
    }

    // ── Deposits ─────────────────────────────────────────────────────────

    /// Deposit governance tokens for the current epoch's subscription
    /// window. Pulls `amount` from the caller into vault custody.
    pub fn deposit(
        &mut self,
        user: Address,
        amount: u128,
        now: Timestamp,
        tokens: &mut TokenLedger,
    ) -> Result<(), VaultError> {
        self.require_not_paused()?;
        if amount == 0 {
            return Err(VaultError::ZeroDeposit);
        }
        let epoch_id = self.current_epoch;
        let epoch = self
            .epochs
            .get_mut(&epoch_id)
            .ok_or(VaultError::NoActiveEpoch)?;
        if !epoch.in_subscription(now) {
            return Err(VaultError::OutOfSubscriptionPeriod);
        }
        tokens.transfer(self.reg_token, user, self.address, amount)?;
        epoch.total_deposit += amount;
        let state = self.user_epochs.entry((user, epoch_id)).or_default();
        state.deposited += amount;
        self.user_globals
            .entry(user)
            .or_default()
            .last_epoch_participated = epoch_id;
        self.events.append(VaultEvent::Deposit {
            user,
            amount,
            epoch: epoch_id,
        });
        info!(%user, amount, epoch = epoch_id, "deposit accepted");
        Ok(())
    }

    // ── Vote recording ───────────────────────────────────────────────────

    /// Record one governance vote for `user`, called by the governor on
    /// every `cast_vote`. Returns whether the vote was newly counted.
    ///
    /// Only effective during the current epoch's lock phase; outside it
    /// the call is accepted and ignored, so the governor never has to know
    /// the vault's schedule. Recording is exactly-once per (user, epoch,
    /// proposal) to tolerate at-least-once replay.
    pub fn record_vote(
        &mut self,
        caller: Address,
        user: Address,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<bool, VaultError> {
        if caller != self.governor {
            return Err(VaultError::OnlyRegGovernorAllowed);
        }
        Ok(self.record_vote_inner(user, proposal_id, now))
    }

    /// Admin replay/backfill of vote records, typically driven by an
    /// off-chain batching script in fixed-size chunks. Returns the number
    /// of newly counted votes; replayed entries are ignored.
    pub fn record_vote_batch_by_admin(
        &mut self,
        caller: Address,
        users: &[Address],
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<usize, VaultError> {
        self.roles.require(caller, Capability::Admin)?;
        let mut newly_recorded = 0;
        for user in users {
            if self.record_vote_inner(*user, proposal_id, now) {
                newly_recorded += 1;
            }
        }
        info!(
            proposal = %proposal_id,
            submitted = users.len(),
            newly_recorded,
            "admin vote batch recorded"
        );
        Ok(newly_recorded)
    }

    fn record_vote_inner(&mut self, user: Address, proposal_id: ProposalId, now: Timestamp) -> bool {
        let epoch_id = self.current_epoch;
        let Some(epoch) = self.epochs.get_mut(&epoch_id) else {
            return false;
        };
        if !epoch.in_lock(now) {
            debug!(%user, epoch = epoch_id, "vote outside lock phase ignored");
            return false;
        }
        let state = self.user_epochs.entry((user, epoch_id)).or_default();
        if !state.recorded_proposals.insert(proposal_id) {
            return false;
        }
        state.vote_count += 1;
        epoch.total_votes += 1;
        if state.vote_count == 1 && state.deposited > 0 {
            epoch.active_weight += state.deposited;
        }
        self.user_globals
            .entry(user)
            .or_default()
            .last_epoch_participated = epoch_id;
        self.events.append(VaultEvent::RecordVote {
            user,
            proposal_id,
            epoch: epoch_id,
        });
        true
    }

    // ── Bonus accounting ─────────────────────────────────────────────────

    /// Bonus share of `user` for `epoch`:
    /// `total_bonus * deposited / active_weight`, where a depositor
    /// carries weight only with at least one recorded vote. The numerator
    /// is the subscription-phase deposit, so withdrawing principal after
    /// lock end does not shrink the share. Computed with a 256-bit
    /// intermediate product.
    pub fn calculate_bonus(&self, user: Address, epoch: EpochId) -> u128 {
        let Some(epoch_state) = self.epochs.get(&epoch) else {
            return 0;
        };
        let Some(state) = self.user_epochs.get(&(user, epoch)) else {
            return 0;
        };
        if state.vote_count == 0 || epoch_state.active_weight == 0 {
            return 0;
        }
        crate::math::mul_div(
            epoch_state.total_bonus,
            state.deposited,
            epoch_state.active_weight,
        )
    }

    // ── Withdrawals & claims ─────────────────────────────────────────────
    //
    // Settlement is keyed by (user, epoch) and stays open forever once the
    // epoch unlocks: opening a later epoch never strands an earlier
    // epoch's principal or bonus.

    /// Withdraw the full remaining principal of `epoch` after its lock
    /// period ends. Re-calls after full withdrawal succeed with a
    /// zero-amount event, simplifying client retries.
    pub fn withdraw(
        &mut self,
        user: Address,
        epoch: EpochId,
        now: Timestamp,
        tokens: &mut TokenLedger,
    ) -> Result<u128, VaultError> {
        let remaining = self
            .user_epochs
            .get(&(user, epoch))
            .map(|s| s.remaining())
            .unwrap_or(0);
        self.withdraw_amount(user, epoch, remaining, now, tokens)
    }

    /// Withdraw part of the principal of `epoch`. `amount` of zero (or a
    /// fully withdrawn position) emits a zero-amount event instead of
    /// failing.
    pub fn withdraw_amount(
        &mut self,
        user: Address,
        epoch: EpochId,
        amount: u128,
        now: Timestamp,
        tokens: &mut TokenLedger,
    ) -> Result<u128, VaultError> {
        self.require_not_paused()?;
        let epoch_state = self
            .epochs
            .get_mut(&epoch)
            .ok_or(VaultError::UnknownEpoch(epoch))?;
        if !epoch_state.unlocked(now) {
            return Err(VaultError::LockPeriodNotEnded {
                ends: epoch_state.lock_period_end.as_secs(),
                now: now.as_secs(),
            });
        }
        let state = self.user_epochs.entry((user, epoch)).or_default();
        let amount = amount.min(state.remaining());
        if amount > 0 {
            tokens.transfer(self.reg_token, self.address, user, amount)?;
            state.withdrawn_amount += amount;
            epoch_state.total_deposit -= amount;
            if state.remaining() == 0 {
                state.withdrawn = true;
            }
        }
        self.events.append(VaultEvent::Withdraw {
            user,
            amount,
            epoch,
        });
        info!(%user, amount, epoch, "withdrawal");
        Ok(amount)
    }

    /// Claim the bonus share of `epoch` after its lock end. A second
    /// claim for the same epoch fails.
    pub fn claim_bonus(
        &mut self,
        user: Address,
        epoch: EpochId,
        now: Timestamp,
        tokens: &mut TokenLedger,
    ) -> Result<u128, VaultError> {
        self.require_not_paused()?;
        let epoch_state = self
            .epochs
            .get(&epoch)
            .ok_or(VaultError::UnknownEpoch(epoch))?;
        if !epoch_state.unlocked(now) {
            return Err(VaultError::LockPeriodNotEnded {
                ends: epoch_state.lock_period_end.as_secs(),
                now: now.as_secs(),
            });
        }
        let bonus_token = epoch_state.bonus_token;
        let already = self
            .user_epochs
            .get(&(user, epoch))
            .map(|s| s.bonus_claimed)
            .unwrap_or(false);
        if already {
            return Err(VaultError::BonusAlreadyClaimed);
        }
        let bonus = self.calculate_bonus(user, epoch);
        if bonus > 0 {
            tokens.transfer(bonus_token, self.address, user, bonus)?;
        }
        let state = self.user_epochs.entry((user, epoch)).or_default();
        state.bonus_claimed = true;
        let global = self.user_globals.entry(user).or_default();
        global.total_bonus_claimed += bonus;
        self.events.append(VaultEvent::ClaimBonus {
            user,
            amount: bonus,
            epoch,
        });
        info!(%user, bonus, epoch, "bonus claimed");
        Ok(bonus)
    }

    // ── Pause guard ──────────────────────────────────────────────────────

    pub fn pause(&mut self, caller: Address) -> Result<(), VaultError> {
        self.roles.require(caller, Capability::Pauser)?;
        if self.paused {
            return Err(VaultError::EnforcedPause);
        }
        self.paused = true;
        self.events.append(VaultEvent::Paused);
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<(), VaultError> {
        self.roles.require(caller, Capability::Pauser)?;
        if !self.paused {
            return Err(VaultError::ExpectedPause);
        }
        self.paused = false;
        self.events.append(VaultEvent::Unpaused);
        Ok(())
    }

    fn require_not_paused(&self) -> Result<(), VaultError> {
        if self.paused {
            Err(VaultError::EnforcedPause)
        } else {
            Ok(())
        }
    }

    // ── Read surface ─────────────────────────────────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn governor(&self) -> Address {
        self.governor
    }

    pub fn reg_token(&self) -> Address {
        self.reg_token
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_epoch(&self) -> EpochId {
        self.current_epoch
    }

    /// Total deposit outstanding in the current epoch.
    pub fn current_total_deposit(&self) -> u128 {
        self.epochs
            .get(&self.current_epoch)
            .map(|e| e.total_deposit)
            .unwrap_or(0)
    }

    pub fn epoch_state(&self, epoch: EpochId) -> Option<&EpochState> {
        self.epochs.get(&epoch)
    }

    pub fn user_epoch_state(&self, user: Address, epoch: EpochId) -> Option<&UserEpochState> {
        self.user_epochs.get(&(user, epoch))
    }

    pub fn user_global_state(&self, user: Address) -> Option<&UserGlobalState> {
        self.user_globals.get(&user)
    }

    pub fn roles(&self) -> &AccessRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut AccessRegistry {
        &mut self.roles
    }

    pub fn events(&self) -> &EventLog<VaultEvent> {
        &self.events
    }
}

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct VaultSnapshot {
    version: u32,
    address: Address,
    governor: Address,
    reg_token: Address,
    current_epoch: EpochId,
    epochs: HashMap<EpochId, EpochState>,
    user_epochs: HashMap<(Address, EpochId), UserEpochState>,
    user_globals: HashMap<Address, UserGlobalState>,
    paused: bool,
    roles: AccessRegistry,
}

impl IncentiveVault {
    pub fn save_state(&self) -> Result<Vec<u8>, VaultError> {
        let snapshot = VaultSnapshot {
            version: SNAPSHOT_VERSION,
            address: self.address,
            governor: self.governor,
            reg_token: self.reg_token,
            current_epoch: self.current_epoch,
            epochs: self.epochs.clone(),
            user_epochs: self.user_epochs.clone(),
            user_globals: self.user_globals.clone(),
            paused: self.paused,
            roles: self.roles.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| VaultError::SnapshotEncode(e.to_string()))
    }

    pub fn load_state(data: &[u8]) -> Result<Self, VaultError> {
        let snapshot: VaultSnapshot =
            bincode::deserialize(data).map_err(|e| VaultError::SnapshotDecode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(VaultError::UnsupportedSnapshotVersion(snapshot.version));
        }
        Ok(Self {
            address: snapshot.address,
            governor: snapshot.governor,
            reg_token: snapshot.reg_token,
            current_epoch: snapshot.current_epoch,
            epochs: snapshot.epochs,
            user_epochs: snapshot.user_epochs,
            user_globals: snapshot.user_globals,
            paused: snapshot.paused,
            roles: snapshot.roles,
            events: EventLog::new(),
        })
    }
}
