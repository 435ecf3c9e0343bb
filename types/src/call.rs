//! Governance action encoding.

use crate::Address;
use serde::{Deserialize, Serialize};

/// One action of an execution batch: a target, an attached value, and an
/// opaque call payload.
///
/// The governor and the timelock forward payloads without interpreting
/// them; only the target decodes its own payload format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: u128, payload: Vec<u8>) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }
}
