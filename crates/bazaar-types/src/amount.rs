use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of fractional decimal digits in one whole unit.
pub const DECIMALS: u32 = 18;

const BASE_UNITS_PER_UNIT: u128 = 10u128.pow(DECIMALS);

/// A quantity of the ledger's native value unit.
///
/// Stored as an integer count of base units (10^18 per whole unit), so
/// equality checks on fees and payments are exact. Parses from and renders
/// to decimal strings such as `"0.1"` or `"2.0"`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_base_units(base: u128) -> Self {
        Self(base)
    }

    /// Whole units, e.g. `Amount::units(2)` is `"2.0"`.
    pub const fn units(whole: u64) -> Self {
        Self(whole as u128 * BASE_UNITS_PER_UNIT)
    }

    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parse a non-negative decimal string with at most 18 fractional digits.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected decimal digits before the point"));
        }
        if s.contains('.') && frac.is_empty() {
            return Err(invalid("expected digits after the point"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("fraction contains non-digit characters"));
        }
        if frac.len() > DECIMALS as usize {
            return Err(invalid("more than 18 fractional digits"));
        }

        let whole: u128 = whole.parse().map_err(|_| invalid("value too large"))?;
        let frac_base: u128 = if frac.is_empty() {
            0
        } else {
            let digits: u128 = frac.parse().map_err(|_| invalid("value too large"))?;
            digits * 10u128.pow(DECIMALS - frac.len() as u32)
        };

        whole
            .checked_mul(BASE_UNITS_PER_UNIT)
            .and_then(|w| w.checked_add(frac_base))
            .map(Amount)
            .ok_or_else(|| invalid("value too large"))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_UNITS_PER_UNIT;
        let frac = self.0 % BASE_UNITS_PER_UNIT;
        if frac == 0 {
            return write!(f, "{whole}.0");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_fractional_units() {
        assert_eq!(
            Amount::parse("0.1").unwrap().base_units(),
            100_000_000_000_000_000
        );
        assert_eq!(Amount::parse("1.0").unwrap(), Amount::units(1));
        assert_eq!(Amount::parse("2").unwrap(), Amount::units(2));
        assert_eq!(Amount::parse(" 0.025 ").unwrap().to_string(), "0.025");
    }

    #[test]
    fn renders_whole_units_with_trailing_zero() {
        assert_eq!(Amount::units(2).to_string(), "2.0");
        assert_eq!(Amount::ZERO.to_string(), "0.0");
        assert_eq!(Amount::from_base_units(1).to_string(), "0.000000000000000001");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", ".5", "1.", "-1", "1.2.3", "abc", "1e3", "0.0000000000000000001"] {
            assert!(
                matches!(Amount::parse(bad), Err(TypeError::InvalidAmount { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        let too_big = format!("{}", u128::MAX);
        assert!(Amount::parse(&too_big).is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let a = Amount::units(1);
        let b = Amount::parse("0.5").unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "1.5");
        assert_eq!(a.checked_sub(b).unwrap(), b);
        assert!(b.checked_sub(a).is_none());
        assert!(Amount::from_base_units(u128::MAX).checked_add(a).is_none());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Amount::parse("0.1").unwrap()).unwrap();
        assert_eq!(json, "\"0.1\"");
        let back: Amount = serde_json::from_str("\"2.0\"").unwrap();
        assert_eq!(back, Amount::units(2));
        assert!(serde_json::from_str::<Amount>("\"x\"").is_err());
    }

    proptest! {
        #[test]
        fn display_parses_back(base in 0u128..=u64::MAX as u128 * 1_000) {
            let amount = Amount::from_base_units(base);
            prop_assert_eq!(Amount::parse(&amount.to_string()).unwrap(), amount);
        }
    }
}
