//! Pricing engine for GST-inclusive line items.
//!
//! Listed costs already carry GST, so the amount charged is the plain sum of
//! discounted line totals. The tax-exclusive subtotal is backed out per line
//! with that line's rate and only exists for display and reporting; it never
//! feeds back into the charged total.
//!
//! Everything here is pure. Totals are derived on demand from current cart
//! state rather than stored and separately mutated.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::value_objects::GstRate;

/// One priceable line: inclusive cost, discount, rate, quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineInput {
    pub cost: i64,
    pub discount: i64,
    pub gst_rate: GstRate,
    pub quantity: u32,
}

/// Totals derived from a set of lines. `total` is the tax-inclusive amount
/// actually charged; `subtotal + tax == total` by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartTotals {
    pub total: i64,
    pub subtotal: Decimal,
    pub tax: Decimal,
}

/// Price after discount. Non-negative as long as `discount <= cost`.
pub fn discounted_price(cost: i64, discount: i64) -> i64 {
    cost - discount
}

/// Discount as a whole percentage, rounded half-up. A zero cost short-circuits
/// to 0 rather than dividing.
pub fn discount_percentage(cost: i64, discount: i64) -> u32 {
    if cost == 0 {
        return 0;
    }
    let pct = Decimal::from(discount) * Decimal::ONE_HUNDRED / Decimal::from(cost);
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Tax-inclusive total for a single line.
pub fn line_total(line: &LineInput) -> i64 {
    discounted_price(line.cost, line.discount) * i64::from(line.quantity)
}

/// Tax-inclusive amount charged for the whole cart. This is the value frozen
/// into an order at submission.
pub fn final_total(lines: &[LineInput]) -> i64 {
    lines.iter().map(line_total).sum()
}

/// Pre-tax subtotal: each line's inclusive total divided by its rate divisor,
/// summed, then rounded to two places half-up.
pub fn subtotal(lines: &[LineInput]) -> Decimal {
    let raw: Decimal = lines
        .iter()
        .map(|l| Decimal::from(line_total(l)) / l.gst_rate.inclusive_divisor())
        .sum();
    raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn total_tax(lines: &[LineInput]) -> Decimal {
    Decimal::from(final_total(lines)) - subtotal(lines)
}

pub fn totals(lines: &[LineInput]) -> CartTotals {
    let total = final_total(lines);
    let subtotal = subtotal(lines);
    CartTotals {
        total,
        subtotal,
        tax: Decimal::from(total) - subtotal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cost: i64, discount: i64, gst_rate: GstRate, quantity: u32) -> LineInput {
        LineInput {
            cost,
            discount,
            gst_rate,
            quantity,
        }
    }

    #[test]
    fn test_discounted_price() {
        assert_eq!(discounted_price(1000, 250), 750);
        assert_eq!(discounted_price(1000, 0), 1000);
        assert_eq!(discounted_price(1000, 1000), 0);
    }

    #[test]
    fn test_discount_percentage() {
        assert_eq!(discount_percentage(1000, 250), 25);
        assert_eq!(discount_percentage(0, 0), 0); // no division by zero
        assert_eq!(discount_percentage(3, 1), 33);
        assert_eq!(discount_percentage(200, 1), 1); // 0.5 rounds up
    }

    #[test]
    fn test_gst_backout_totals() {
        let lines = [
            line(1180, 0, GstRate::Gst18, 1),
            line(1000, 100, GstRate::Gst5, 2),
        ];
        let totals = totals(&lines);
        assert_eq!(totals.total, 2980);
        assert_eq!(totals.subtotal, Decimal::new(271429, 2)); // 1000 + 1714.29
        assert_eq!(totals.tax, Decimal::new(26571, 2));
        assert_eq!(totals.subtotal + totals.tax, Decimal::from(totals.total));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = totals(&[]);
        assert_eq!(totals.total, 0);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
    }
}
