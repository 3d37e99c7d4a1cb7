use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bazaar_types::{AccountId, Amount, ItemId};
use tracing::{debug, info};

use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::events::{MarketEvent, MarketEventKind};
use crate::records::{Item, ItemRecord, ItemState};
use crate::settlement::Settlement;
use crate::snapshot::CatalogSnapshot;
use crate::traits::{MarketReader, MarketWriter};
use crate::validation::{CatalogValidator, ValidationReport};

/// Authoritative in-memory marketplace ledger.
///
/// The whole catalog sits behind one `RwLock`: every mutating call holds the
/// write lock from its first precondition check to its last effect, so no
/// reader ever observes a half-applied transition. Queries share the read
/// lock.
pub struct InMemoryMarketplace {
    operator: AccountId,
    settlement: Arc<dyn Settlement>,
    inner: RwLock<MarketState>,
}

struct MarketState {
    items: BTreeMap<ItemId, Item>,
    item_count: u64,
    listing_fee: Amount,
    operator_balance: Amount,
    journal: Vec<MarketEvent>,
}

impl MarketState {
    fn record(&mut self, kind: MarketEventKind) {
        let seq = self.journal.len() as u64 + 1;
        self.journal.push(MarketEvent::new(seq, kind));
    }

    fn snapshot(&self, operator: AccountId) -> CatalogSnapshot {
        CatalogSnapshot {
            items: self.items.clone(),
            item_count: self.item_count,
            listing_fee: self.listing_fee,
            operator,
            operator_balance: self.operator_balance,
        }
    }

    fn check_fee(&self, fee_paid: Amount) -> Result<(), MarketError> {
        if fee_paid != self.listing_fee {
            return Err(MarketError::InsufficientFee {
                expected: self.listing_fee,
                paid: fee_paid,
            });
        }
        Ok(())
    }

    fn credited_balance(&self, fee_paid: Amount) -> Result<Amount, MarketError> {
        self.operator_balance
            .checked_add(fee_paid)
            .ok_or(MarketError::BalanceOverflow)
    }
}

impl InMemoryMarketplace {
    pub fn new(config: MarketConfig, settlement: Arc<dyn Settlement>) -> Self {
        info!(
            operator = %config.operator,
            listing_fee = %config.listing_fee,
            "marketplace opened"
        );
        Self {
            operator: config.operator,
            settlement,
            inner: RwLock::new(MarketState {
                items: BTreeMap::new(),
                item_count: 0,
                listing_fee: config.listing_fee,
                operator_balance: Amount::ZERO,
                journal: Vec::new(),
            }),
        }
    }

    pub fn operator(&self) -> AccountId {
        self.operator
    }

    /// Check catalog and journal invariants under a single read lock.
    pub fn validate(&self) -> Result<ValidationReport, MarketError> {
        let state = self.read_state("validate")?;
        Ok(CatalogValidator::validate(
            &state.snapshot(self.operator),
            &state.journal,
        ))
    }

    fn read_state(&self, during: &str) -> Result<RwLockReadGuard<'_, MarketState>, MarketError> {
        self.inner
            .read()
            .map_err(|_| MarketError::StatePoisoned(during.to_string()))
    }

    fn write_state(
        &self,
        during: &str,
    ) -> Result<RwLockWriteGuard<'_, MarketState>, MarketError> {
        self.inner
            .write()
            .map_err(|_| MarketError::StatePoisoned(during.to_string()))
    }

    fn require_operator(&self, caller: &AccountId, action: &'static str) -> Result<(), MarketError> {
        if *caller != self.operator {
            return Err(MarketError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    fn apply_create(
        state: &mut MarketState,
        caller: &AccountId,
        resource_uri: &str,
        price: Amount,
        fee_paid: Amount,
    ) -> Result<ItemId, MarketError> {
        if price.is_zero() {
            return Err(MarketError::InvalidPrice);
        }
        state.check_fee(fee_paid)?;
        let balance = state.credited_balance(fee_paid)?;

        let id = ItemId::new(state.item_count + 1);
        state.items.insert(
            id,
            Item {
                id,
                creator: *caller,
                resource_uri: resource_uri.to_string(),
                state: ItemState::Listed {
                    seller: *caller,
                    price,
                },
            },
        );
        state.item_count = id.get();
        state.operator_balance = balance;
        state.record(MarketEventKind::Listed {
            id,
            creator: *caller,
            price,
            fee: fee_paid,
        });
        Ok(id)
    }

    fn apply_buy(
        &self,
        state: &mut MarketState,
        caller: &AccountId,
        id: ItemId,
        payment: Amount,
    ) -> Result<AccountId, MarketError> {
        let item = state.items.get_mut(&id).ok_or(MarketError::NotFound(id))?;
        let ItemState::Listed { seller, price } = item.state else {
            return Err(MarketError::AlreadySold(id));
        };
        if payment != price {
            return Err(MarketError::WrongPayment {
                expected: price,
                paid: payment,
            });
        }

        // Last fallible step; nothing below can fail.
        self.settlement.credit(&seller, payment)?;

        item.state = ItemState::Owned {
            holder: *caller,
            last_price: price,
        };
        state.record(MarketEventKind::Sold {
            id,
            seller,
            buyer: *caller,
            price,
        });
        Ok(seller)
    }

    fn apply_resell(
        state: &mut MarketState,
        caller: &AccountId,
        id: ItemId,
        new_price: Amount,
        fee_paid: Amount,
    ) -> Result<(), MarketError> {
        let listing_fee = state.listing_fee;
        let balance = state.operator_balance.checked_add(fee_paid);

        let item = state.items.get_mut(&id).ok_or(MarketError::NotFound(id))?;
        if !item.is_owned_by(caller) {
            return Err(MarketError::Unauthorized {
                caller: *caller,
                action: "resell",
            });
        }
        if new_price.is_zero() {
            return Err(MarketError::InvalidPrice);
        }
        if fee_paid != listing_fee {
            return Err(MarketError::InsufficientFee {
                expected: listing_fee,
                paid: fee_paid,
            });
        }
        let balance = balance.ok_or(MarketError::BalanceOverflow)?;

        item.state = ItemState::Listed {
            seller: *caller,
            price: new_price,
        };
        state.operator_balance = balance;
        state.record(MarketEventKind::Relisted {
            id,
            seller: *caller,
            price: new_price,
            fee: fee_paid,
        });
        Ok(())
    }
}

fn rejected(action: &str, caller: &AccountId, error: MarketError) -> MarketError {
    debug!(action, caller = %caller, error = %error, "call rejected");
    error
}

impl MarketWriter for InMemoryMarketplace {
    fn create_and_list(
        &self,
        caller: &AccountId,
        resource_uri: &str,
        price: Amount,
        fee_paid: Amount,
    ) -> Result<ItemId, MarketError> {
        let mut state = self.write_state("create_and_list")?;
        let id = Self::apply_create(&mut state, caller, resource_uri, price, fee_paid)
            .map_err(|e| rejected("create_and_list", caller, e))?;

        info!(%id, seller = %caller, %price, "item listed");
        Ok(id)
    }

    fn buy(&self, caller: &AccountId, id: ItemId, payment: Amount) -> Result<(), MarketError> {
        let mut state = self.write_state("buy")?;
        let seller = self
            .apply_buy(&mut state, caller, id, payment)
            .map_err(|e| rejected("buy", caller, e))?;

        info!(%id, %seller, buyer = %caller, price = %payment, "item sold");
        Ok(())
    }

    fn resell(
        &self,
        caller: &AccountId,
        id: ItemId,
        new_price: Amount,
        fee_paid: Amount,
    ) -> Result<(), MarketError> {
        let mut state = self.write_state("resell")?;
        Self::apply_resell(&mut state, caller, id, new_price, fee_paid)
            .map_err(|e| rejected("resell", caller, e))?;

        info!(%id, seller = %caller, price = %new_price, "item relisted");
        Ok(())
    }

    fn update_listing_fee(&self, caller: &AccountId, new_fee: Amount) -> Result<(), MarketError> {
        self.require_operator(caller, "update the listing fee")
            .map_err(|e| rejected("update_listing_fee", caller, e))?;

        let mut state = self.write_state("update_listing_fee")?;
        let old_fee = state.listing_fee;
        state.listing_fee = new_fee;
        state.record(MarketEventKind::FeeUpdated { old_fee, new_fee });

        info!(%old_fee, %new_fee, "listing fee updated");
        Ok(())
    }

    fn withdraw_fees(&self, caller: &AccountId) -> Result<Amount, MarketError> {
        self.require_operator(caller, "withdraw fees")
            .map_err(|e| rejected("withdraw_fees", caller, e))?;

        let mut state = self.write_state("withdraw_fees")?;
        let amount = state.operator_balance;
        if amount.is_zero() {
            return Ok(amount);
        }
        self.settlement
            .credit(caller, amount)
            .map_err(|e| rejected("withdraw_fees", caller, e.into()))?;

        state.operator_balance = Amount::ZERO;
        state.record(MarketEventKind::FeesWithdrawn {
            operator: *caller,
            amount,
        });

        info!(operator = %caller, %amount, "fees withdrawn");
        Ok(amount)
    }
}

impl MarketReader for InMemoryMarketplace {
    fn snapshot(&self) -> Result<CatalogSnapshot, MarketError> {
        Ok(self.read_state("snapshot")?.snapshot(self.operator))
    }

    fn fetch_unsold(&self) -> Result<Vec<ItemRecord>, MarketError> {
        let state = self.read_state("fetch_unsold")?;
        Ok(state
            .items
            .values()
            .filter(|item| item.is_listed())
            .map(Item::record)
            .collect())
    }

    fn fetch_owned_by(&self, caller: &AccountId) -> Result<Vec<ItemRecord>, MarketError> {
        let state = self.read_state("fetch_owned_by")?;
        Ok(state
            .items
            .values()
            .filter(|item| item.is_owned_by(caller))
            .map(Item::record)
            .collect())
    }

    fn fetch_listed_by(&self, caller: &AccountId) -> Result<Vec<ItemRecord>, MarketError> {
        let state = self.read_state("fetch_listed_by")?;
        Ok(state
            .items
            .values()
            .filter(|item| item.is_listed_by(caller))
            .map(Item::record)
            .collect())
    }

    fn get_item(&self, id: ItemId) -> Result<Option<ItemRecord>, MarketError> {
        let state = self.read_state("get_item")?;
        Ok(state.items.get(&id).map(Item::record))
    }

    fn item_count(&self) -> Result<u64, MarketError> {
        Ok(self.read_state("item_count")?.item_count)
    }

    fn listing_fee(&self) -> Result<Amount, MarketError> {
        Ok(self.read_state("listing_fee")?.listing_fee)
    }

    fn operator_balance(&self) -> Result<Amount, MarketError> {
        Ok(self.read_state("operator_balance")?.operator_balance)
    }

    fn events_since(&self, after: u64) -> Result<Vec<MarketEvent>, MarketError> {
        let state = self.read_state("events_since")?;
        let start = (after as usize).min(state.journal.len());
        Ok(state.journal[start..].to_vec())
    }
}
