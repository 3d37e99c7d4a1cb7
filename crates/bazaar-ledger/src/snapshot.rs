use std::collections::BTreeMap;

use bazaar_types::{AccountId, Amount, ItemId};

use crate::records::{Item, ItemRecord};

/// Point-in-time copy of the catalog.
///
/// Queries return lazy iterators in ascending id order. The snapshot is not
/// consumed by iterating, so a query can be restarted as often as needed and
/// always yields the same sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub(crate) items: BTreeMap<ItemId, Item>,
    pub(crate) item_count: u64,
    pub(crate) listing_fee: Amount,
    pub(crate) operator: AccountId,
    pub(crate) operator_balance: Amount,
}

impl CatalogSnapshot {
    /// Items currently held in escrow for sale.
    pub fn unsold(&self) -> impl Iterator<Item = ItemRecord> + '_ {
        self.items
            .values()
            .filter(|item| item.is_listed())
            .map(Item::record)
    }

    pub fn owned_by(&self, account: AccountId) -> impl Iterator<Item = ItemRecord> + '_ {
        self.items
            .values()
            .filter(move |item| item.is_owned_by(&account))
            .map(Item::record)
    }

    /// Active listings whose seller is `account`.
    pub fn listed_by(&self, account: AccountId) -> impl Iterator<Item = ItemRecord> + '_ {
        self.items
            .values()
            .filter(move |item| item.is_listed_by(&account))
            .map(Item::record)
    }

    pub fn get(&self, id: ItemId) -> Option<ItemRecord> {
        self.items.get(&id).map(Item::record)
    }

    /// Stored items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub fn listing_fee(&self) -> Amount {
        self.listing_fee
    }

    pub fn operator(&self) -> AccountId {
        self.operator
    }

    pub fn operator_balance(&self) -> Amount {
        self.operator_balance
    }
}
