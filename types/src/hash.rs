//! Hash-derived identifiers for proposals and execution batches.
//!
//! Both identifiers are Blake2b-256 digests over the bincode encoding of
//! the identified content, so the same batch always hashes to the same id
//! on every node.

use crate::Call;
use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// A 32-byte proposal identifier: hash of (calls, description hash).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId([u8; 32]);

impl ProposalId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProposalId({})", hex(&self.0[..4]))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

/// A 32-byte execution-batch identifier: hash of (calls, salt).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId([u8; 32]);

impl BatchId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", hex(&self.0[..4]))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

/// Hash a human-readable proposal description into its 32-byte digest.
pub fn hash_description(description: &str) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(description.as_bytes());
    hasher.finalize().into()
}

/// Derive the proposal id for a call batch and its description hash.
pub fn hash_proposal(calls: &[Call], description_hash: &[u8; 32]) -> ProposalId {
    ProposalId(digest_batch(b"agora.proposal", calls, description_hash))
}

/// Derive the batch id for a call batch and a salt.
///
/// The governor uses the proposal's description hash as the salt, which
/// ties the scheduled batch back to its proposal.
pub fn hash_batch(calls: &[Call], salt: &[u8; 32]) -> BatchId {
    BatchId(digest_batch(b"agora.batch", calls, salt))
}

fn digest_batch(domain: &[u8], calls: &[Call], tail: &[u8; 32]) -> [u8; 32] {
    let encoded = bincode::serialize(calls).unwrap_or_default();
    let mut hasher = Blake2b256::new();
    hasher.update(domain);
    hasher.update(&encoded);
    hasher.update(tail);
    hasher.finalize().into()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
