use std::fmt;

use bazaar_types::{AccountId, Amount, ItemId};
use serde::{Deserialize, Serialize};

/// Who currently has custody of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "account", rename_all = "snake_case")]
pub enum Holder {
    /// The marketplace holds the item in escrow while it is for sale.
    Marketplace,
    Account(AccountId),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marketplace => write!(f, "marketplace"),
            Self::Account(id) => write!(f, "{id}"),
        }
    }
}

/// Sale state of an item.
///
/// Escrow custody and the "for sale" flag are the same fact, so they are one
/// variant: a listed item is always held by the marketplace and always has a
/// seller, a sold item never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemState {
    Listed { seller: AccountId, price: Amount },
    Owned { holder: AccountId, last_price: Amount },
}

/// Stored catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub creator: AccountId,
    pub resource_uri: String,
    pub state: ItemState,
}

impl Item {
    pub fn is_listed(&self) -> bool {
        matches!(self.state, ItemState::Listed { .. })
    }

    pub fn owner(&self) -> Holder {
        match self.state {
            ItemState::Listed { .. } => Holder::Marketplace,
            ItemState::Owned { holder, .. } => Holder::Account(holder),
        }
    }

    pub fn seller(&self) -> Option<AccountId> {
        match self.state {
            ItemState::Listed { seller, .. } => Some(seller),
            ItemState::Owned { .. } => None,
        }
    }

    /// Ask price while listed, last sale price once sold.
    pub fn price(&self) -> Amount {
        match self.state {
            ItemState::Listed { price, .. } => price,
            ItemState::Owned { last_price, .. } => last_price,
        }
    }

    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        self.owner() == Holder::Account(*account)
    }

    /// True when `account` is the seller of an active listing.
    pub fn is_listed_by(&self, account: &AccountId) -> bool {
        matches!(self.state, ItemState::Listed { seller, .. } if seller == *account)
    }

    pub fn record(&self) -> ItemRecord {
        ItemRecord {
            id: self.id,
            creator: self.creator,
            seller: self.seller(),
            owner: self.owner(),
            price: self.price(),
            sold: !self.is_listed(),
            resource_uri: self.resource_uri.clone(),
        }
    }
}

/// Flat, caller-facing view of an item.
///
/// `seller` is `None` once the item is sold and not yet relisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub creator: AccountId,
    pub seller: Option<AccountId>,
    pub owner: Holder,
    pub price: Amount,
    pub sold: bool,
    pub resource_uri: String,
}
