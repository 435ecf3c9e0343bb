//! External fungible-token surface.
//!
//! Token contracts are trusted external collaborators: the vault and the
//! timelock custody only move funds through this transfer/approve/
//! transfer_from surface, and failures propagate as call failures.
//! `TokenLedger` holds every token's balances in one place, keyed by
//! (token address, holder).

use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("balance overflow")]
    Overflow,
}

/// Balances and allowances for every external token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    /// (token, holder) → balance.
    balances: HashMap<(Address, Address), u128>,
    /// (token, owner, spender) → allowance.
    allowances: HashMap<(Address, Address, Address), u128>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> u128 {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Create `amount` new units of `token` in `to`'s balance.
    pub fn mint(&mut self, token: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        let balance = self.balances.entry((token, to)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    /// Move `amount` of `token` from `from` to `to`.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances.insert((token, from), available - amount);
        let dest = self.balances.entry((token, to)).or_insert(0);
        *dest = dest.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    /// Let `spender` move up to `amount` of `owner`'s `token`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: u128) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Spend `spender`'s allowance to move `owner`'s tokens.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(token, owner, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(token, owner, to, amount)?;
        self.allowances.insert((token, owner, spender), allowed - amount);
        Ok(())
    }
}
