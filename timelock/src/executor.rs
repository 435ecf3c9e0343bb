//! The timelock executor engine.

use crate::dispatch::CallDispatcher;
use crate::error::TimelockError;
use crate::event::TimelockEvent;
use agora_access::{AccessRegistry, Capability};
use agora_events::EventLog;
use agora_types::{hash_batch, Address, BatchId, Call, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct BatchRecord {
    ready: Timestamp,
    executed: bool,
}

/// Delayed execution queue for approved action batches.
///
/// The executor holds its own capability registry. Its own address is
/// granted `Admin` alongside the external admin, so a multisig-and-
/// executor hybrid can administer roles through scheduled batches.
pub struct TimelockExecutor {
    /// Address this executor is deployed under; targets see it as caller.
    address: Address,
    min_delay: u64,
    batches: HashMap<BatchId, BatchRecord>,
    roles: AccessRegistry,
    events: EventLog<TimelockEvent>,
}

impl TimelockExecutor {
    pub fn new(
        address: Address,
        min_delay: u64,
        admin: Address,
        proposers: &[Address],
        executors: &[Address],
    ) -> Self {
        let mut roles = AccessRegistry::new();
        roles
            .bootstrap(admin)
            .expect("fresh registry bootstraps once");
        // Self-administration: the executor address also holds Admin.
        roles
            .grant(admin, Capability::Admin, address)
            .expect("admin was just bootstrapped");
        for proposer in proposers {
            roles
                .grant(admin, Capability::Proposer, *proposer)
                .expect("admin was just bootstrapped");
        }
        for executor in executors {
            roles
                .grant(admin, Capability::Executor, *executor)
                .expect("admin was just bootstrapped");
        }
        Self {
            address,
            min_delay,
            batches: HashMap::new(),
            roles,
            events: EventLog::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    /// Ready timestamp of a scheduled batch.
    pub fn ready_at(&self, id: BatchId) -> Option<Timestamp> {
        self.batches.get(&id).map(|b| b.ready)
    }

    pub fn is_executed(&self, id: BatchId) -> bool {
        self.batches.get(&id).map(|b| b.executed).unwrap_or(false)
    }

    /// Schedule a batch for execution no earlier than `now + min_delay`.
    /// Restricted to the proposer capability; duplicate ids are rejected.
    pub fn schedule(
        &mut self,
        caller: Address,
        calls: &[Call],
        salt: &[u8; 32],
        now: Timestamp,
    ) -> Result<BatchId, TimelockError> {
        self.roles.require(caller, Capability::Proposer)?;
        let id = hash_batch(calls, salt);
        if self.batches.contains_key(&id) {
            return Err(TimelockError::BatchAlreadyScheduled(id));
        }
        let ready = now.plus(self.min_delay);
        self.batches.insert(id, BatchRecord {
            ready,
            executed: false,
        });
        self.events.append(TimelockEvent::BatchScheduled { id, ready });
        info!(%id, %ready, "batch scheduled");
        Ok(id)
    }

    /// Execute a ready batch, dispatching each call in order.
    ///
    /// All-or-nothing: the first failing call aborts with `CallFailed` and
    /// the batch stays unexecuted (the host's per-call transaction rolls
    /// back any partial target effects). A batch executes at most once.
    pub fn execute(
        &mut self,
        caller: Address,
        calls: &[Call],
        salt: &[u8; 32],
        now: Timestamp,
        dispatcher: &mut dyn CallDispatcher,
    ) -> Result<BatchId, TimelockError> {
        self.roles.require(caller, Capability::Executor)?;
        let id = hash_batch(calls, salt);
        let record = self
            .batches
            .get(&id)
            .copied()
            .ok_or(TimelockError::UnknownBatch(id))?;
        if record.executed {
            return Err(TimelockError::BatchAlreadyExecuted(id));
        }
        if now < record.ready {
            return Err(TimelockError::BatchNotReady {
                id,
                ready: record.ready.as_secs(),
                now: now.as_secs(),
            });
        }
        for (index, call) in calls.iter().enumerate() {
            dispatcher
                .dispatch(call)
                .map_err(|e| TimelockError::CallFailed {
                    id,
                    index,
                    reason: e.0,
                })?;
        }
        if let Some(stored) = self.batches.get_mut(&id) {
            stored.executed = true;
        }
        self.events.append(TimelockEvent::BatchExecuted { id, at: now });
        info!(%id, "batch executed");
        Ok(id)
    }

    /// Cancel a scheduled batch. Not allowed after execution.
    pub fn cancel(&mut self, caller: Address, id: BatchId) -> Result<(), TimelockError> {
        self.roles.require(caller, Capability::Canceller)?;
        let record = self
            .batches
            .get(&id)
            .ok_or(TimelockError::UnknownBatch(id))?;
        if record.executed {
            return Err(TimelockError::BatchAlreadyExecuted(id));
        }
        self.batches.remove(&id);
        self.events.append(TimelockEvent::BatchCanceled { id });
        info!(%id, "batch canceled");
        Ok(())
    }

    /// Change the minimum delay. Admin-gated; only affects batches
    /// scheduled after the change.
    pub fn update_delay(&mut self, caller: Address, new_delay: u64) -> Result<(), TimelockError> {
        self.roles.require(caller, Capability::Admin)?;
        let old = self.min_delay;
        self.min_delay = new_delay;
        self.events.append(TimelockEvent::MinDelayChanged {
            old,
            new: new_delay,
        });
        Ok(())
    }

    pub fn roles(&self) -> &AccessRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut AccessRegistry {
        &mut self.roles
    }

    pub fn events(&self) -> &EventLog<TimelockEvent> {
        &self.events
    }
}

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct TimelockSnapshot {
    version: u32,
    address: Address,
    min_delay: u64,
    batches: HashMap<BatchId, BatchRecord>,
    roles: AccessRegistry,
}

impl TimelockExecutor {
    pub fn save_state(&self) -> Result<Vec<u8>, TimelockError> {
        let snapshot = TimelockSnapshot {
            version: SNAPSHOT_VERSION,
            address: self.address,
            min_delay: self.min_delay,
            batches: self.batches.clone(),
            roles: self.roles.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| TimelockError::SnapshotEncode(e.to_string()))
    }

    pub fn load_state(data: &[u8]) -> Result<Self, TimelockError> {
        let snapshot: TimelockSnapshot = bincode::deserialize(data)
            .map_err(|e| TimelockError::SnapshotDecode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TimelockError::UnsupportedSnapshotVersion(snapshot.version));
        }
        Ok(Self {
            address: snapshot.address,
            min_delay: snapshot.min_delay,
            batches: snapshot.batches,
            roles: snapshot.roles,
            events: EventLog::new(),
        })
    }
}
