//! Seat pricing with VAT breakdown.

use serde::{Deserialize, Serialize};

use super::Money;

/// Subscription plan chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Standard,
    Pro,
}

impl Plan {
    /// Unrecognized plan names fall back to the standard plan.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" => Plan::Pro,
            _ => Plan::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Standard => "standard",
            Plan::Pro => "pro",
        }
    }
}

/// Yearly per-seat prices in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceList {
    pub standard_seat_price: u32,
    pub pro_seat_price: u32,
    pub vat_percent: u32,
}

impl PriceList {
    pub fn seat_price(&self, plan: Plan) -> u32 {
        match plan {
            Plan::Standard => self.standard_seat_price,
            Plan::Pro => self.pro_seat_price,
        }
    }

    /// Prices `seats` seats (at least one) on `plan`.
    pub fn quote(&self, plan: Plan, seats: u32) -> Quote {
        let seats = seats.max(1);
        let unit_price = u64::from(self.seat_price(plan));
        let net = unit_price * u64::from(seats);
        // Round half up to whole units.
        let vat = (net * u64::from(self.vat_percent) + 50) / 100;
        Quote {
            plan,
            seats,
            unit_price,
            vat_percent: self.vat_percent,
            net,
            vat,
            gross: net + vat,
        }
    }
}

/// Price breakdown for one checkout. Amounts in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub plan: Plan,
    pub seats: u32,
    pub unit_price: u64,
    pub vat_percent: u32,
    pub net: u64,
    pub vat: u64,
    pub gross: u64,
}

impl Quote {
    /// Amount charged through the payment provider.
    pub fn charge(&self) -> Money {
        Money::from_units(self.net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn prices() -> PriceList {
        PriceList {
            standard_seat_price: 299,
            pro_seat_price: 499,
            vat_percent: 21,
        }
    }

    #[test]
    fn three_standard_seats() {
        let quote = prices().quote(Plan::Standard, 3);
        assert_eq!(quote.net, 897);
        assert_eq!(quote.vat, 188);
        assert_eq!(quote.gross, 1085);
        assert_eq!(quote.charge().to_string(), "897.00");
    }

    #[test]
    fn pro_plan_uses_pro_price() {
        let quote = prices().quote(Plan::Pro, 2);
        assert_eq!(quote.unit_price, 499);
        assert_eq!(quote.net, 998);
    }

    #[test]
    fn zero_seats_become_one() {
        let quote = prices().quote(Plan::Standard, 0);
        assert_eq!(quote.seats, 1);
        assert_eq!(quote.net, 299);
    }

    #[test]
    fn reverse_charge_has_no_vat() {
        let list = PriceList {
            vat_percent: 0,
            ..prices()
        };
        let quote = list.quote(Plan::Standard, 4);
        assert_eq!(quote.vat, 0);
        assert_eq!(quote.gross, quote.net);
    }

    #[test]
    fn plan_parsing() {
        assert_eq!(Plan::parse("pro"), Plan::Pro);
        assert_eq!(Plan::parse(" PRO "), Plan::Pro);
        assert_eq!(Plan::parse("enterprise"), Plan::Standard);
        assert_eq!(Plan::parse(""), Plan::Standard);
    }

    #[test]
    fn quote_serializes_camel_case() {
        let json = serde_json::to_value(prices().quote(Plan::Standard, 3)).unwrap();
        assert_eq!(json["unitPrice"], 299);
        assert_eq!(json["vatPercent"], 21);
        assert_eq!(json["plan"], "standard");
    }

    proptest! {
        #[test]
        fn gross_is_net_plus_rounded_vat(seats in 1u32..10_000, pct in 0u32..=100) {
            let list = PriceList { vat_percent: pct, ..prices() };
            let quote = list.quote(Plan::Standard, seats);
            prop_assert_eq!(quote.gross, quote.net + quote.vat);
            // Rounded VAT is within half a unit of the exact value.
            let exact_times_100 = quote.net * u64::from(pct);
            prop_assert!((quote.vat * 100).abs_diff(exact_times_100) <= 50);
        }
    }
}
