use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bazaar_types::{AccountId, Amount, ItemId};
use serde::{Deserialize, Serialize};

/// Journal entry for one successful state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Dense sequence number, starting at 1.
    pub seq: u64,
    /// Wall-clock milliseconds since UNIX epoch.
    pub recorded_ms: u64,
    pub kind: MarketEventKind,
}

impl MarketEvent {
    pub(crate) fn new(seq: u64, kind: MarketEventKind) -> Self {
        let recorded_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            seq,
            recorded_ms,
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEventKind {
    /// A new item was created and put up for sale.
    Listed {
        id: ItemId,
        creator: AccountId,
        price: Amount,
        fee: Amount,
    },
    /// A listed item changed hands.
    Sold {
        id: ItemId,
        seller: AccountId,
        buyer: AccountId,
        price: Amount,
    },
    /// The owner of a sold item put it back up for sale.
    Relisted {
        id: ItemId,
        seller: AccountId,
        price: Amount,
        fee: Amount,
    },
    FeeUpdated { old_fee: Amount, new_fee: Amount },
    FeesWithdrawn { operator: AccountId, amount: Amount },
}

impl MarketEventKind {
    /// Listing fee collected by this event, if any.
    pub fn fee_collected(&self) -> Option<Amount> {
        match self {
            Self::Listed { fee, .. } | Self::Relisted { fee, .. } => Some(*fee),
            _ => None,
        }
    }

    pub fn item(&self) -> Option<ItemId> {
        match self {
            Self::Listed { id, .. } | Self::Sold { id, .. } | Self::Relisted { id, .. } => {
                Some(*id)
            }
            Self::FeeUpdated { .. } | Self::FeesWithdrawn { .. } => None,
        }
    }
}

impl fmt::Display for MarketEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed { id, price, .. } => write!(f, "Listed {id} at {price}"),
            Self::Sold { id, buyer, price, .. } => write!(f, "Sold {id} to {buyer} for {price}"),
            Self::Relisted { id, price, .. } => write!(f, "Relisted {id} at {price}"),
            Self::FeeUpdated { old_fee, new_fee } => {
                write!(f, "FeeUpdated {old_fee} -> {new_fee}")
            }
            Self::FeesWithdrawn { amount, .. } => write!(f, "FeesWithdrawn {amount}"),
        }
    }
}
