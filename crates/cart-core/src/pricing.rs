//! # Pricing Engine
//!
//! Subtotal, discounted and taxed totals for an order.
//!
//! ```text
//! subtotal = Σ price × quantity
//! running  = subtotal
//! for d in discounts (ascending id):  running -= floor(running × p / 100) | amount
//! running  = max(running, 0)
//! for t in taxes (ascending id):      running += floor(running × percent / 100)
//! total    = running
//! ```
//!
//! Everything is integer minor units; the clamp happens once, after all
//! discounts, and taxes compound on the running total.

use crate::money::Money;
use crate::order::Order;
use serde::Serialize;

/// Intermediate and final amounts for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    /// Sum of line totals
    pub subtotal: Money,
    /// After discounts, clamped at zero
    pub discounted: Money,
    /// After taxes
    pub total: Money,
}

impl PriceBreakdown {
    /// `total - subtotal`; negative when discounts outweigh taxes
    pub fn adjustment(&self) -> Money {
        self.total - self.subtotal
    }

    /// Tax added on top of the discounted amount
    pub fn tax_total(&self) -> Money {
        self.total - self.discounted
    }

    /// Amount actually removed by discounts (after the clamp)
    pub fn discount_total(&self) -> Money {
        self.subtotal - self.discounted
    }
}

/// Sum of `price * quantity` over the order lines
pub fn subtotal(order: &Order) -> Money {
    order.lines().iter().map(|line| line.line_total()).sum()
}

/// Discounted and taxed total, never negative
pub fn total(order: &Order) -> Money {
    breakdown(order).total
}

/// Full pricing pass over an order
pub fn breakdown(order: &Order) -> PriceBreakdown {
    let subtotal = subtotal(order);

    let discounted = order
        .discounts()
        .iter()
        .fold(subtotal, |running, discount| running - discount.reduction(running))
        .clamp_non_negative();

    let total = order
        .taxes()
        .iter()
        .fold(discounted, |running, tax| running + tax.charge(running));

    PriceBreakdown {
        subtotal,
        discounted,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Discount, Item, Tax};
    use crate::money::Currency;

    fn item(id: u64, price: i64) -> Item {
        Item::new(id, format!("Item {id}"), "Test item", Money::from_minor(price), Currency::Usd)
            .unwrap()
    }

    fn order_of(price: i64, quantity: u32) -> Order {
        Order::new(1).with_item(item(1, price), quantity).unwrap()
    }

    #[test]
    fn test_no_adjustments_total_equals_subtotal() {
        let order = Order::new(1)
            .with_item(item(1, 1234), 3)
            .unwrap()
            .with_item(item(2, 99), 7)
            .unwrap();

        assert_eq!(subtotal(&order), Money::from_minor(1234 * 3 + 99 * 7));
        assert_eq!(total(&order), subtotal(&order));
        assert_eq!(breakdown(&order).adjustment(), Money::ZERO);
    }

    #[test]
    fn test_empty_order_is_zero() {
        let order = Order::new(1).with_tax(Tax::new(1, "VAT", 20).unwrap());
        assert_eq!(subtotal(&order), Money::ZERO);
        assert_eq!(total(&order), Money::ZERO);
    }

    #[test]
    fn test_percent_discount() {
        let order = order_of(1000, 1).with_discount(Discount::percent(1, "10%", 10).unwrap());
        let b = breakdown(&order);

        assert_eq!(b.subtotal, Money::from_minor(1000));
        assert_eq!(b.discounted, Money::from_minor(900));
        assert_eq!(b.total, Money::from_minor(900));
    }

    #[test]
    fn test_amount_discount_clamps_to_zero() {
        let order = order_of(500, 1)
            .with_discount(Discount::amount(1, "big", Money::from_minor(1000)).unwrap());
        assert_eq!(total(&order), Money::ZERO);

        let taxed = order.with_tax(Tax::new(1, "VAT", 20).unwrap());
        assert_eq!(total(&taxed), Money::ZERO);
    }

    #[test]
    fn test_clamp_happens_after_all_discounts() {
        // running total is -500 then -250 before the clamp
        let order = order_of(500, 1)
            .with_discount(Discount::amount(1, "big", Money::from_minor(1000)).unwrap())
            .with_discount(Discount::percent(2, "half", 50).unwrap());
        assert_eq!(total(&order), Money::ZERO);
    }

    #[test]
    fn test_tax_after_discount() {
        let order = order_of(1000, 1)
            .with_discount(Discount::percent(1, "half", 50).unwrap())
            .with_tax(Tax::new(1, "VAT", 20).unwrap());
        let b = breakdown(&order);

        assert_eq!(b.discounted, Money::from_minor(500));
        assert_eq!(b.total, Money::from_minor(600));
        assert_eq!(b.adjustment(), Money::from_minor(-400));
        assert_eq!(b.discount_total(), Money::from_minor(500));
        assert_eq!(b.tax_total(), Money::from_minor(100));
    }

    #[test]
    fn test_positive_adjustment() {
        let order = order_of(1000, 1).with_tax(Tax::new(1, "sales", 10).unwrap());
        let b = breakdown(&order);

        assert_eq!(b.total, Money::from_minor(1100));
        assert_eq!(b.adjustment(), Money::from_minor(100));
    }

    #[test]
    fn test_taxes_compound() {
        // 1000 + 100 = 1100, 1100 + 110 = 1210
        let order = order_of(1000, 1)
            .with_tax(Tax::new(1, "state", 10).unwrap())
            .with_tax(Tax::new(2, "city", 10).unwrap());
        assert_eq!(total(&order), Money::from_minor(1210));
    }

    #[test]
    fn test_truncating_division_each_step() {
        // 999 - floor(999 * 10 / 100) = 999 - 99 = 900
        // 900 + floor(900 * 7 / 100) = 900 + 63 = 963
        let order = order_of(333, 3)
            .with_discount(Discount::percent(1, "10%", 10).unwrap())
            .with_tax(Tax::new(1, "7%", 7).unwrap());
        assert_eq!(total(&order), Money::from_minor(963));
    }

    #[test]
    fn test_discounts_apply_in_id_order() {
        // id 1 (amount 100) first: 1000 -> 900 -> 450
        // id 2 (50%) first would be: 1000 -> 500 -> 400
        let order = order_of(1000, 1)
            .with_discount(Discount::percent(2, "half", 50).unwrap())
            .with_discount(Discount::amount(1, "flat", Money::from_minor(100)).unwrap());
        assert_eq!(total(&order), Money::from_minor(450));
    }

    #[test]
    fn test_total_is_idempotent() {
        let order = order_of(1999, 2)
            .with_discount(Discount::percent(1, "15%", 15).unwrap())
            .with_tax(Tax::new(1, "VAT", 21).unwrap());

        let first = total(&order);
        let second = total(&order);
        assert_eq!(first, second);
        assert_eq!(order.total(), first);
    }

    #[test]
    fn test_total_never_negative() {
        for amount_off in [0, 1, 499, 500, 501, 10_000] {
            for percent in [1, 50, 100] {
                let order = order_of(500, 1)
                    .with_discount(Discount::amount(1, "a", Money::from_minor(amount_off)).unwrap())
                    .with_discount(Discount::percent(2, "p", percent).unwrap())
                    .with_tax(Tax::new(1, "t", 25).unwrap());
                assert!(!total(&order).is_negative());
            }
        }
    }

    #[test]
    fn test_extreme_inputs_saturate_instead_of_wrapping() {
        use crate::catalog::{MAX_TAX_PERCENT, MAX_UNIT_AMOUNT};
        use crate::order::MAX_QUANTITY;

        // ~1e14 subtotal compounded by five 1000% taxes exceeds i64
        let huge = (1..=5).fold(order_of(MAX_UNIT_AMOUNT, MAX_QUANTITY), |order, id| {
            order.with_tax(Tax::new(id, "excise", i64::from(MAX_TAX_PERCENT)).unwrap())
        });
        assert_eq!(
            subtotal(&huge),
            Money::from_minor(MAX_UNIT_AMOUNT * i64::from(MAX_QUANTITY))
        );
        assert_eq!(total(&huge), Money::from_minor(i64::MAX));

        let wiped = order_of(1000, 1)
            .with_discount(Discount::amount(1, "all", Money::from_minor(i64::MAX)).unwrap())
            .with_discount(Discount::percent(2, "half", 50).unwrap())
            .with_tax(Tax::new(1, "VAT", 20).unwrap());
        assert_eq!(total(&wiped), Money::ZERO);
    }
}
