use std::collections::HashMap;

use agora_access::{AccessRegistry, Capability};
use agora_events::EventLog;
use agora_ledger::VotingPowerLedger;
use agora_timelock::{CallDispatcher, DispatchError, TimelockExecutor};
use agora_types::{hash_description, hash_proposal, Address, Call, ProposalId, Timestamp};
use agora_vault::IncentiveVault;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::action::GovernorAction;
use crate::error::GovernorError;
use crate::event::GovernorEvent;
use crate::proposal::{ProposalRecord, ProposalState, ProposerMode, VoteSupport};

const SNAPSHOT_VERSION: u32 = 1;

/// Voting schedule and thresholds. Delays and periods are in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Seconds between proposal creation and the voting-power snapshot.
    pub voting_delay: u64,
    /// Seconds the voting window stays open after the snapshot.
    pub voting_period: u64,
    /// Minimum voting power for threshold-gated proposer modes.
    pub proposal_threshold: u128,
    /// Minimum "for" weight for a proposal to succeed. Zero disables the
    /// quorum check.
    pub quorum: u128,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            voting_delay: 86_400,
            voting_period: 7 * 86_400,
            proposal_threshold: 0,
            quorum: 0,
        }
    }
}

/// Drives the proposal lifecycle: creation gated by the proposer policy,
/// snapshot-weighted voting, then queueing and execution through the
/// timelock. Optionally notifies an incentive vault of effective votes.
pub struct ProposalGovernor {
    address: Address,
    /// Only this address may invoke the self-governance setters.
    timelock: Address,
    config: GovernorConfig,
    proposer_mode: ProposerMode,
    incentive_enabled: bool,
    incentive_vault: Option<Address>,
    proposals: HashMap<ProposalId, ProposalRecord>,
    roles: AccessRegistry,
    events: EventLog<GovernorEvent>,
}

impl ProposalGovernor {
    pub fn new(
        address: Address,
        timelock: Address,
        admin: Address,
        config: GovernorConfig,
        proposer_mode: ProposerMode,
    ) -> Self {
        let mut roles = AccessRegistry::new();
        roles
            .bootstrap(admin)
            .expect("fresh registry bootstraps once");
        Self {
            address,
            timelock,
            config,
            proposer_mode,
            incentive_enabled: false,
            incentive_vault: None,
            proposals: HashMap::new(),
            roles,
            events: EventLog::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn timelock(&self) -> Address {
        self.timelock
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn proposer_mode(&self) -> ProposerMode {
        self.proposer_mode
    }

    pub fn incentive_enabled(&self) -> bool {
        self.incentive_enabled
    }

    pub fn incentive_vault(&self) -> Option<Address> {
        self.incentive_vault
    }

    /// Canonical id for a call batch and description, usable before the
    /// proposal exists.
    pub fn proposal_id(calls: &[Call], description_hash: &[u8; 32]) -> ProposalId {
        hash_proposal(calls, description_hash)
    }

    // ---- lifecycle -------------------------------------------------------

    /// Open a proposal. Eligibility depends on the active proposer mode;
    /// threshold checks read the caller's *current* voting power.
    pub fn propose(
        &mut self,
        caller: Address,
        calls: &[Call],
        description: &str,
        now: Timestamp,
        ledger: &VotingPowerLedger,
    ) -> Result<ProposalId, GovernorError> {
        self.check_proposer(caller, ledger)?;

        let description_hash = hash_description(description);
        let id = hash_proposal(calls, &description_hash);
        if self.proposals.contains_key(&id) {
            return Err(GovernorError::ProposalAlreadyExists(id));
        }

        let snapshot = now.plus(self.config.voting_delay);
        let deadline = snapshot.plus(self.config.voting_period);
        self.proposals.insert(id, ProposalRecord {
            id,
            proposer: caller,
            description_hash,
            created_at: now,
            snapshot,
            deadline,
            against_votes: 0,
            for_votes: 0,
            abstain_votes: 0,
            voters: Default::default(),
            queued: false,
            executed: false,
            canceled: false,
        });
        self.events.append(GovernorEvent::ProposalCreated {
            id,
            proposer: caller,
            snapshot,
            deadline,
        });
        info!(%id, proposer = %caller, %snapshot, %deadline, "proposal created");
        Ok(id)
    }

    fn check_proposer(
        &self,
        caller: Address,
        ledger: &VotingPowerLedger,
    ) -> Result<(), GovernorError> {
        let has_role = self.roles.has(caller, Capability::Proposer);
        let votes = ledger.get_votes(caller);
        let has_votes = votes >= self.config.proposal_threshold;
        match self.proposer_mode {
            ProposerMode::RoleOnly if !has_role => {
                Err(GovernorError::InvalidProposerWithRole(caller))
            }
            ProposerMode::VotingPowerOnly if !has_votes => {
                Err(GovernorError::InvalidProposerWithVotingPower {
                    proposer: caller,
                    votes,
                    threshold: self.config.proposal_threshold,
                })
            }
            ProposerMode::RoleAndVotingPower if !(has_role && has_votes) => {
                Err(GovernorError::InvalidProposerWithRoleAndVotingPower(caller))
            }
            ProposerMode::RoleOrVotingPower if !(has_role || has_votes) => {
                Err(GovernorError::InvalidProposerWithRoleOrVotingPower(caller))
            }
            _ => Ok(()),
        }
    }

    /// Cast a vote with the voter's power at the proposal snapshot.
    ///
    /// When the incentive hook is enabled and the configured vault is
    /// supplied, the vote is reported to it best-effort: a vault refusal
    /// is logged and never rolls the vote back. Returns the weight
    /// counted.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        id: ProposalId,
        support: VoteSupport,
        now: Timestamp,
        ledger: &VotingPowerLedger,
        vault: Option<&mut IncentiveVault>,
    ) -> Result<u128, GovernorError> {
        let state = self.state(id, now)?;
        if state != ProposalState::Active {
            return Err(GovernorError::VotingNotActive { id, state });
        }
        let snapshot = self
            .proposals
            .get(&id)
            .map(|p| p.snapshot)
            .ok_or(GovernorError::UnknownProposal(id))?;
        // Active implies snapshot < now, so the lookup is strictly past.
        let weight = ledger.get_past_votes(voter, snapshot, now)?;

        let record = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernorError::UnknownProposal(id))?;
        if record.voters.contains(&voter) {
            return Err(GovernorError::AlreadyCastVote { id, voter });
        }
        record.voters.insert(voter);
        match support {
            VoteSupport::Against => record.against_votes += weight,
            VoteSupport::For => record.for_votes += weight,
            VoteSupport::Abstain => record.abstain_votes += weight,
        }
        self.events.append(GovernorEvent::VoteCast {
            id,
            voter,
            support,
            weight,
        });
        info!(%id, %voter, ?support, weight, "vote cast");

        if self.incentive_enabled {
            if let Some(vault) = vault {
                if Some(vault.address()) == self.incentive_vault {
                    if let Err(e) = vault.record_vote(self.address, voter, id, now) {
                        warn!(%id, %voter, error = %e, "incentive vault rejected vote record");
                    }
                }
            }
        }
        Ok(weight)
    }

    /// Hand a succeeded proposal to the timelock. Permissionless, like
    /// voting itself; the governor must hold the timelock's proposer
    /// capability. The description hash doubles as the batch salt.
    pub fn queue(
        &mut self,
        calls: &[Call],
        description_hash: [u8; 32],
        now: Timestamp,
        executor: &mut TimelockExecutor,
    ) -> Result<ProposalId, GovernorError> {
        let id = hash_proposal(calls, &description_hash);
        let state = self.state(id, now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernorError::ProposalNotSuccessful { id, state });
        }
        let batch = executor.schedule(self.address, calls, &description_hash, now)?;
        let ready = executor.ready_at(batch).unwrap_or(now);
        if let Some(record) = self.proposals.get_mut(&id) {
            record.queued = true;
        }
        self.events.append(GovernorEvent::ProposalQueued { id, batch, ready });
        info!(%id, %batch, %ready, "proposal queued");
        Ok(id)
    }

    /// Execute a queued proposal through the timelock once its delay has
    /// elapsed. Calls targeting the governor itself are decoded and staged
    /// during dispatch; everything else goes to `external`. Staged actions
    /// are applied only after the whole batch succeeds, so a failing
    /// external call leaves the governor untouched and the batch
    /// retriable.
    pub fn execute(
        &mut self,
        calls: &[Call],
        description_hash: [u8; 32],
        now: Timestamp,
        executor: &mut TimelockExecutor,
        external: &mut dyn CallDispatcher,
    ) -> Result<ProposalId, GovernorError> {
        let id = hash_proposal(calls, &description_hash);
        let state = self.state(id, now)?;
        if state != ProposalState::Queued {
            return Err(GovernorError::ProposalNotQueued { id, state });
        }
        let caller = self.address;
        let mut staged = Vec::new();
        {
            let mut adapter = SelfRouting {
                governor: caller,
                staged: &mut staged,
                external,
            };
            executor.execute(caller, calls, &description_hash, now, &mut adapter)?;
        }
        for action in staged {
            self.apply_action(action);
        }
        if let Some(record) = self.proposals.get_mut(&id) {
            record.executed = true;
        }
        self.events.append(GovernorEvent::ProposalExecuted { id, at: now });
        info!(%id, "proposal executed");
        Ok(id)
    }

    /// Emergency cancellation, restricted to the canceller capability.
    /// Anything short of executed can be canceled.
    pub fn cancel_by_admin(
        &mut self,
        caller: Address,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<(), GovernorError> {
        self.roles.require(caller, Capability::Canceller)?;
        let state = self.state(id, now)?;
        if state == ProposalState::Executed {
            return Err(GovernorError::ProposalAlreadyExecuted(id));
        }
        if let Some(record) = self.proposals.get_mut(&id) {
            record.canceled = true;
        }
        self.events.append(GovernorEvent::ProposalCanceled { id });
        info!(%id, "proposal canceled");
        Ok(())
    }

    // ---- state derivation ------------------------------------------------

    /// Derive the lifecycle state at `now`. Terminal flags win over the
    /// time windows; otherwise the record's timestamps and tallies decide.
    pub fn state(&self, id: ProposalId, now: Timestamp) -> Result<ProposalState, GovernorError> {
        let record = self
            .proposals
            .get(&id)
            .ok_or(GovernorError::UnknownProposal(id))?;
        if record.canceled {
            return Ok(ProposalState::Canceled);
        }
        if record.executed {
            return Ok(ProposalState::Executed);
        }
        if record.queued {
            return Ok(ProposalState::Queued);
        }
        if now <= record.snapshot {
            return Ok(ProposalState::Pending);
        }
        if now <= record.deadline {
            return Ok(ProposalState::Active);
        }
        if self.tally_succeeded(record) {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    fn tally_succeeded(&self, record: &ProposalRecord) -> bool {
        record.for_votes > record.against_votes && record.for_votes >= self.config.quorum
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&ProposalRecord> {
        self.proposals.get(&id)
    }

    /// (against, for, abstain) tallies.
    pub fn proposal_votes(&self, id: ProposalId) -> Option<(u128, u128, u128)> {
        self.proposals
            .get(&id)
            .map(|r| (r.against_votes, r.for_votes, r.abstain_votes))
    }

    pub fn has_voted(&self, id: ProposalId, account: Address) -> bool {
        self.proposals
            .get(&id)
            .map(|r| r.has_voted(&account))
            .unwrap_or(false)
    }

    // ---- self-governance -------------------------------------------------

    /// Entry point for calls the timelock dispatches back at the governor.
    /// Only the configured timelock address may invoke it; the payload is
    /// a serialized `GovernorAction`.
    pub fn handle_executor_call(
        &mut self,
        caller: Address,
        payload: &[u8],
    ) -> Result<(), GovernorError> {
        if caller != self.timelock {
            return Err(GovernorError::GovernorOnlyExecutor(caller));
        }
        let action = GovernorAction::decode(payload)
            .map_err(|e| GovernorError::InvalidActionPayload(e.to_string()))?;
        self.apply_action(action);
        Ok(())
    }

    fn apply_action(&mut self, action: GovernorAction) {
        match action {
            GovernorAction::SetProposerMode(mode) => {
                let old = self.proposer_mode;
                self.proposer_mode = mode;
                self.events
                    .append(GovernorEvent::ProposerModeChanged { old, new: mode });
                info!(?old, new = ?mode, "proposer mode changed");
            }
            GovernorAction::SetIncentiveEnabled(enabled) => {
                self.incentive_enabled = enabled;
                self.events
                    .append(GovernorEvent::IncentiveEnabledChanged { enabled });
                info!(enabled, "incentive hook toggled");
            }
            GovernorAction::SetIncentiveVault(vault) => {
                self.incentive_vault = Some(vault);
                self.events.append(GovernorEvent::IncentiveVaultChanged { vault });
                info!(%vault, "incentive vault changed");
            }
            GovernorAction::SetProposalThreshold(threshold) => {
                let old = self.config.proposal_threshold;
                self.config.proposal_threshold = threshold;
                self.events.append(GovernorEvent::ProposalThresholdChanged {
                    old,
                    new: threshold,
                });
                info!(old, new = threshold, "proposal threshold changed");
            }
        }
    }

    pub fn roles(&self) -> &AccessRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut AccessRegistry {
        &mut self.roles
    }

    pub fn events(&self) -> &EventLog<GovernorEvent> {
        &self.events
    }

    // ---- snapshots -------------------------------------------------------

    pub fn save_state(&self) -> Result<Vec<u8>, GovernorError> {
        let snapshot = GovernorSnapshot {
            version: SNAPSHOT_VERSION,
            address: self.address,
            timelock: self.timelock,
            config: self.config,
            proposer_mode: self.proposer_mode,
            incentive_enabled: self.incentive_enabled,
            incentive_vault: self.incentive_vault,
            proposals: self.proposals.clone(),
            roles: self.roles.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| GovernorError::SnapshotEncode(e.to_string()))
    }

    pub fn load_state(data: &[u8]) -> Result<Self, GovernorError> {
        let snapshot: GovernorSnapshot = bincode::deserialize(data)
            .map_err(|e| GovernorError::SnapshotDecode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GovernorError::UnsupportedSnapshotVersion(snapshot.version));
        }
        Ok(Self {
            address: snapshot.address,
            timelock: snapshot.timelock,
            config: snapshot.config,
            proposer_mode: snapshot.proposer_mode,
            incentive_enabled: snapshot.incentive_enabled,
            incentive_vault: snapshot.incentive_vault,
            proposals: snapshot.proposals,
            roles: snapshot.roles,
            events: EventLog::new(),
        })
    }
}

/// Dispatcher wrapper used during `execute`: governor-targeted calls are
/// decoded and collected for application after the batch completes, the
/// rest are forwarded to the host dispatcher. A malformed self-call
/// payload fails the batch like any other dispatch error.
struct SelfRouting<'a> {
    governor: Address,
    staged: &'a mut Vec<GovernorAction>,
    external: &'a mut dyn CallDispatcher,
}

impl CallDispatcher for SelfRouting<'_> {
    fn dispatch(&mut self, call: &Call) -> Result<(), DispatchError> {
        if call.target == self.governor {
            let action = GovernorAction::decode(&call.payload)
                .map_err(|e| DispatchError(e.to_string()))?;
            self.staged.push(action);
            Ok(())
        } else {
            self.external.dispatch(call)
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GovernorSnapshot {
    version: u32,
    address: Address,
    timelock: Address,
    config: GovernorConfig,
    proposer_mode: ProposerMode,
    incentive_enabled: bool,
    incentive_vault: Option<Address>,
    proposals: HashMap<ProposalId, ProposalRecord>,
    roles: AccessRegistry,
}
