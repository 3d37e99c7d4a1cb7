use std::collections::HashMap;
use std::sync::RwLock;

use bazaar_types::{AccountId, Amount};

/// Errors reported by a settlement backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("crediting {account} would overflow its balance")]
    Overflow { account: AccountId },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Value transfer capability invoked by the ledger.
///
/// The ledger decides *who* is paid and *how much*; the backend moves the
/// value. A failed credit must leave the backend unchanged.
pub trait Settlement: Send + Sync {
    /// Pay `amount` to `to`.
    fn credit(&self, to: &AccountId, amount: Amount) -> Result<(), SettlementError>;

    /// Total value credited to `account` so far.
    fn balance_of(&self, account: &AccountId) -> Amount;
}

/// Balance book kept in memory, for tests, demos, and embedding.
#[derive(Default)]
pub struct InMemorySettlement {
    balances: RwLock<HashMap<AccountId, Amount>>,
}

impl InMemorySettlement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances held in the book, or `None` if it overflows.
    pub fn total(&self) -> Option<Amount> {
        let balances = self.balances.read().unwrap_or_else(|e| e.into_inner());
        balances
            .values()
            .try_fold(Amount::ZERO, |acc, v| acc.checked_add(*v))
    }
}

impl Settlement for InMemorySettlement {
    fn credit(&self, to: &AccountId, amount: Amount) -> Result<(), SettlementError> {
        let mut balances = self.balances.write().unwrap_or_else(|e| e.into_inner());
        let current = balances.get(to).copied().unwrap_or_default();
        let updated = current
            .checked_add(amount)
            .ok_or(SettlementError::Overflow { account: *to })?;
        balances.insert(*to, updated);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        let balances = self.balances.read().unwrap_or_else(|e| e.into_inner());
        balances.get(account).copied().unwrap_or_default()
    }
}
