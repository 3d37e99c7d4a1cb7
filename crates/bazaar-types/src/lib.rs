//! Foundation types for the Bazaar marketplace ledger.
//!
//! Every other Bazaar crate depends on `bazaar-types`.
//!
//! # Key Types
//!
//! - [`AccountId`] — Caller identity derived from key material with BLAKE3
//! - [`ItemId`] — Dense, never-reused catalog identifier starting at 1
//! - [`Amount`] — Quantity of the ledger's single native value unit

pub mod account;
pub mod amount;
pub mod error;
pub mod item;

pub use account::{AccountId, KeyMaterial};
pub use amount::Amount;
pub use error::TypeError;
pub use item::ItemId;
