use std::path::Path;

use bazaar_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// Default listing fee: 0.025 units.
pub const DEFAULT_LISTING_FEE: Amount = Amount::from_base_units(25_000_000_000_000_000);

/// Construction parameters for a marketplace ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Identity entitled to the accumulated listing fees.
    pub operator: AccountId,
    /// Fee charged on every listing and relisting.
    pub listing_fee: Amount,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            operator: AccountId::from_label("operator"),
            listing_fee: DEFAULT_LISTING_FEE,
        }
    }
}

impl MarketConfig {
    pub fn new(operator: AccountId, listing_fee: Amount) -> Self {
        Self {
            operator,
            listing_fee,
        }
    }

    /// Parse a TOML document. Missing keys fall back to [`Default`].
    pub fn from_toml_str(input: &str) -> Result<Self, MarketError> {
        toml::from_str(input).map_err(|e| MarketError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MarketError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MarketError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, MarketError> {
        toml::to_string_pretty(self).map_err(|e| MarketError::Config(e.to_string()))
    }
}
