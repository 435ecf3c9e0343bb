use crate::registry::Capability;
use agora_types::Address;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("account {account} is missing capability {capability:?}")]
    UnauthorizedAccount {
        account: Address,
        capability: Capability,
    },

    #[error("registry is already initialized")]
    InvalidInitialization,
}
