//! Marketplace ledger for the Bazaar asset market.
//!
//! This crate is the heart of Bazaar. It provides:
//! - Item records whose custody is an explicit `Listed` / `Owned` state
//! - `MarketWriter` / `MarketReader` trait boundaries
//! - `InMemoryMarketplace`, the authoritative single-lock implementation
//! - The `Settlement` capability used to pay sellers and the operator
//! - An append-only event journal and a catalog validator

pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod records;
pub mod settlement;
pub mod snapshot;
pub mod traits;
pub mod validation;

pub use config::MarketConfig;
pub use error::MarketError;
pub use events::{MarketEvent, MarketEventKind};
pub use memory::InMemoryMarketplace;
pub use records::{Holder, Item, ItemRecord, ItemState};
pub use settlement::{InMemorySettlement, Settlement, SettlementError};
pub use snapshot::CatalogSnapshot;
pub use traits::{MarketReader, MarketWriter};
pub use validation::{CatalogValidator, ValidationReport, Violation, ViolationKind};

pub use bazaar_types::{AccountId, Amount, ItemId};
