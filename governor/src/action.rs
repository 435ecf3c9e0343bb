use serde::{Deserialize, Serialize};

use agora_types::Address;

use crate::proposal::ProposerMode;

/// Self-governance operations. These are only reachable through the
/// timelock: a proposal encodes one of these as a call payload targeting
/// the governor's own address, and the executor feeds it back through
/// `handle_executor_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorAction {
    SetProposerMode(ProposerMode),
    SetIncentiveEnabled(bool),
    SetIncentiveVault(Address),
    SetProposalThreshold(u128),
}

impl GovernorAction {
    pub fn encode(&self) -> Vec<u8> {
        // Serialization of this enum cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }

    pub fn decode(payload: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(payload)
    }
}
