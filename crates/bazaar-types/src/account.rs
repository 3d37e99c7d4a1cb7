use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive an [`AccountId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMaterial {
    /// A 32-byte public key held by the account's signer.
    PublicKey([u8; 32]),
    /// A human-readable label, for local deployments and tests.
    Label(String),
}

/// Identity of a caller on the marketplace ledger.
///
/// Derived deterministically from [`KeyMaterial`] using BLAKE3, so the same
/// key or label always yields the same account. The marketplace itself is
/// never an `AccountId`; escrow custody is a distinct holder state in the
/// ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    hash: [u8; 32],
}

impl AccountId {
    /// Derive an `AccountId` from key material.
    pub fn derive(material: &KeyMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"bazaar-account-v1:");
        match material {
            KeyMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            KeyMaterial::Label(label) => {
                hasher.update(b"label:");
                hasher.update(label.as_bytes());
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Shorthand for `derive(&KeyMaterial::Label(..))`.
    pub fn from_label(label: impl Into<String>) -> Self {
        Self::derive(&KeyMaterial::Label(label.into()))
    }

    /// Random account for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&KeyMaterial::PublicKey(bytes))
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("acct:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from 64 hex characters, with or without the `acct:` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("acct:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.short_id())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

impl FromStr for AccountId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_hex()
    }
}
