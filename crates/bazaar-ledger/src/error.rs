use bazaar_types::{AccountId, Amount, ItemId};

use crate::settlement::SettlementError;

/// Errors produced by marketplace operations.
///
/// Every variant is a rejection: the ledger state is left exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("price must be strictly positive")]
    InvalidPrice,

    #[error("listing fee mismatch: expected {expected}, paid {paid}")]
    InsufficientFee { expected: Amount, paid: Amount },

    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("payment mismatch: price is {expected}, paid {paid}")]
    WrongPayment { expected: Amount, paid: Amount },

    #[error("item {0} is not listed for sale")]
    AlreadySold(ItemId),

    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        caller: AccountId,
        action: &'static str,
    },

    #[error("settlement failed: {0}")]
    Settlement(#[from] SettlementError),

    #[error("operator balance overflow")]
    BalanceOverflow,

    #[error("marketplace state lock poisoned during {0}")]
    StatePoisoned(String),

    #[error("configuration error: {0}")]
    Config(String),
}
