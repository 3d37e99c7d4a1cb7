use bazaar_types::{AccountId, Amount, ItemId};

use crate::error::MarketError;
use crate::events::MarketEvent;
use crate::records::ItemRecord;
use crate::snapshot::CatalogSnapshot;

/// Write boundary for marketplace state transitions.
///
/// Each call either applies in full or fails with a [`MarketError`] and
/// leaves the ledger untouched.
pub trait MarketWriter: Send + Sync {
    /// Mint a new item and list it for sale, paying the listing fee.
    fn create_and_list(
        &self,
        caller: &AccountId,
        resource_uri: &str,
        price: Amount,
        fee_paid: Amount,
    ) -> Result<ItemId, MarketError>;

    /// Purchase a listed item for exactly its price.
    fn buy(&self, caller: &AccountId, id: ItemId, payment: Amount) -> Result<(), MarketError>;

    /// Relist an item the caller owns, paying the listing fee.
    fn resell(
        &self,
        caller: &AccountId,
        id: ItemId,
        new_price: Amount,
        fee_paid: Amount,
    ) -> Result<(), MarketError>;

    /// Operator only.
    fn update_listing_fee(&self, caller: &AccountId, new_fee: Amount) -> Result<(), MarketError>;

    /// Operator only. Pays out and zeroes the accumulated fees.
    fn withdraw_fees(&self, caller: &AccountId) -> Result<Amount, MarketError>;
}

/// Read boundary for catalog queries.
pub trait MarketReader: Send + Sync {
    fn snapshot(&self) -> Result<CatalogSnapshot, MarketError>;

    fn fetch_unsold(&self) -> Result<Vec<ItemRecord>, MarketError>;

    fn fetch_owned_by(&self, caller: &AccountId) -> Result<Vec<ItemRecord>, MarketError>;

    fn fetch_listed_by(&self, caller: &AccountId) -> Result<Vec<ItemRecord>, MarketError>;

    fn get_item(&self, id: ItemId) -> Result<Option<ItemRecord>, MarketError>;

    /// Number of items ever created; also the most recently assigned id.
    fn item_count(&self) -> Result<u64, MarketError>;

    fn listing_fee(&self) -> Result<Amount, MarketError>;

    fn operator_balance(&self) -> Result<Amount, MarketError>;

    /// Journal entries with `seq > after`.
    fn events_since(&self, after: u64) -> Result<Vec<MarketEvent>, MarketError>;

    fn events(&self) -> Result<Vec<MarketEvent>, MarketError> {
        self.events_since(0)
    }
}
