use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier for an item.
///
/// Ids are assigned densely starting at [`ItemId::FIRST`] and are never
/// reused; the most recently assigned id equals the number of items ever
/// created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub const FIRST: ItemId = ItemId(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id assigned after this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
