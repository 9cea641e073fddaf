use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartLine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Two-decimal currency rounding, half away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn lines_subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

pub fn checkout_totals(subtotal: Decimal, tax_rate: Decimal) -> CheckoutTotals {
    let tax = round_currency(subtotal * tax_rate);
    let total = round_currency(subtotal + tax);
    CheckoutTotals { subtotal, tax, total }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{checkout_totals, round_currency};

    #[test]
    fn rounds_midpoint_away_from_zero() {
        assert_eq!(round_currency(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_currency(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
        assert_eq!(round_currency(Decimal::new(1099, 3)), Decimal::new(110, 2));
        assert_eq!(round_currency(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn checkout_totals_apply_tax_then_round() {
        let totals = checkout_totals(Decimal::new(2198, 2), Decimal::new(5, 2));

        assert_eq!(totals.subtotal, Decimal::new(2198, 2));
        assert_eq!(totals.tax, Decimal::new(110, 2));
        assert_eq!(totals.total, Decimal::new(2308, 2));
    }

    #[test]
    fn zero_tax_rate_keeps_subtotal() {
        let totals = checkout_totals(Decimal::new(349, 2), Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(349, 2));
    }
}
