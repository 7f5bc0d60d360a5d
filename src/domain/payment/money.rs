//! Monetary amounts in integer minor units.

use std::fmt;

use crate::domain::foundation::ValidationError;

/// Amount of money in cents. Never a float, so the wire value cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn from_units(units: u64) -> Self {
        Self {
            cents: units * 100,
        }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Parses a provider amount such as `"897.00"` or `"12.5"`.
    pub fn parse_decimal(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::invalid_format("amount", format!("'{}'", value));
        let (whole, fraction) = match value.trim().split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (value.trim(), ""),
        };
        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .map(Self::from_cents)
            .ok_or_else(invalid)
    }
}

/// Two-decimal representation, e.g. `897.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_whole_units_with_two_decimals() {
        assert_eq!(Money::from_units(897).to_string(), "897.00");
        assert_eq!(Money::from_units(0).to_string(), "0.00");
    }

    #[test]
    fn formats_cents() {
        assert_eq!(Money::from_cents(18837).to_string(), "188.37");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn parses_provider_amounts() {
        assert_eq!(Money::parse_decimal("897.00").unwrap(), Money::from_units(897));
        assert_eq!(Money::parse_decimal("12.5").unwrap(), Money::from_cents(1250));
        assert_eq!(Money::parse_decimal("7").unwrap(), Money::from_units(7));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", ".50", "1.234", "-1.00", "1e3", "abc"] {
            assert!(Money::parse_decimal(bad).is_err(), "accepted {bad:?}");
        }
    }

    proptest! {
        #[test]
        fn display_always_has_two_decimals(cents in 0u64..10_000_000_000) {
            let text = Money::from_cents(cents).to_string();
            let (_, fraction) = text.split_once('.').unwrap();
            prop_assert_eq!(fraction.len(), 2);
            prop_assert_eq!(Money::parse_decimal(&text).unwrap().cents(), cents);
        }
    }
}
