//! The capability registry — tag → set of holders.

use crate::error::AccessError;
use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Capability tags gating the operations of the governance core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Administers the registry itself (grant/revoke) and admin-gated
    /// component operations.
    Admin,
    /// May rewrite voting-power balances on the ledger.
    Register,
    /// May submit proposals (governor) or schedule batches (timelock).
    Proposer,
    /// May execute ready batches on the timelock.
    Executor,
    /// May cancel proposals or scheduled batches.
    Canceller,
    /// May pause and unpause the incentive vault.
    Pauser,
}

/// An explicit authorization map: capability → set of identities.
///
/// Bootstrapped exactly once with an initial admin; all later grants and
/// revocations require the caller to hold `Capability::Admin`. A component
/// may grant `Admin` to its own address for self-administered topologies.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessRegistry {
    holders: HashMap<Capability, HashSet<Address>>,
}

impl AccessRegistry {
    /// Create an empty registry with no admin. Must be bootstrapped before
    /// any grant succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant the initial `Admin` capability. Callable exactly once: a
    /// registry that already has an admin rejects re-initialization.
    pub fn bootstrap(&mut self, admin: Address) -> Result<(), AccessError> {
        if self
            .holders
            .get(&Capability::Admin)
            .is_some_and(|set| !set.is_empty())
        {
            return Err(AccessError::InvalidInitialization);
        }
        self.holders
            .entry(Capability::Admin)
            .or_default()
            .insert(admin);
        info!(%admin, "access registry bootstrapped");
        Ok(())
    }

    /// Whether `account` holds `capability`.
    pub fn has(&self, account: Address, capability: Capability) -> bool {
        self.holders
            .get(&capability)
            .is_some_and(|set| set.contains(&account))
    }

    /// Fail with `UnauthorizedAccount` unless `account` holds `capability`.
    pub fn require(&self, account: Address, capability: Capability) -> Result<(), AccessError> {
        if self.has(account, capability) {
            Ok(())
        } else {
            Err(AccessError::UnauthorizedAccount {
                account,
                capability,
            })
        }
    }

    /// Grant `capability` to `who`. Admin-gated.
    pub fn grant(
        &mut self,
        caller: Address,
        capability: Capability,
        who: Address,
    ) -> Result<(), AccessError> {
        self.require(caller, Capability::Admin)?;
        self.holders.entry(capability).or_default().insert(who);
        info!(%who, ?capability, "capability granted");
        Ok(())
    }

    /// Revoke `capability` from `who`. Admin-gated. Revoking a capability
    /// the account never held is a no-op.
    pub fn revoke(
        &mut self,
        caller: Address,
        capability: Capability,
        who: Address,
    ) -> Result<(), AccessError> {
        self.require(caller, Capability::Admin)?;
        if let Some(set) = self.holders.get_mut(&capability) {
            set.remove(&who);
        }
        info!(%who, ?capability, "capability revoked");
        Ok(())
    }
}
