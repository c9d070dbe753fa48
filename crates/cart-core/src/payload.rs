//! # Checkout Payload Builder
//!
//! Turns an item or a priced order into the line items sent to the hosted
//! checkout page. Field names match the provider's `price_data` shape.
//!
//! The provider rejects negative unit amounts, so the difference between the
//! priced total and the plain subtotal is folded into the payload:
//!
//! ```text
//! adjustment > 0  →  extra "Tax/Discount adjustment" line (qty 1)
//! adjustment < 0  →  first line's unit_amount -= |adjustment|, floored at 0
//! adjustment = 0  →  unchanged
//! ```
//!
//! When the reduction exceeds the first line's unit amount, the excess is
//! absorbed rather than carried to later lines.

use crate::catalog::Item;
use crate::error::BuildError;
use crate::money::{Currency, Money};
use crate::order::{Order, OrderLine};
use crate::pricing;
use serde::Serialize;
use tracing::debug;

/// Display name of the synthetic line carrying net tax
pub const ADJUSTMENT_LINE_NAME: &str = "Tax/Discount adjustment";

/// A line item in the provider's format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLineItem {
    pub price_data: PriceData,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceData {
    pub currency: Currency,
    /// Minor units, never negative
    pub unit_amount: Money,
    pub product_data: ProductData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CheckoutLineItem {
    /// Line for a catalog item at its list price
    pub fn from_item(item: &Item, quantity: u32) -> Self {
        Self {
            price_data: PriceData {
                currency: item.currency(),
                unit_amount: item.price(),
                product_data: ProductData {
                    name: item.name().to_string(),
                    description: Some(item.description().to_string()),
                },
            },
            quantity,
        }
    }

    fn from_order_line(line: &OrderLine) -> Self {
        Self::from_item(line.item(), line.quantity())
    }

    /// Synthetic line carrying a positive adjustment
    fn adjustment(amount: Money, currency: Currency) -> Self {
        Self {
            price_data: PriceData {
                currency,
                unit_amount: amount,
                product_data: ProductData {
                    name: ADJUSTMENT_LINE_NAME.to_string(),
                    description: None,
                },
            },
            quantity: 1,
        }
    }

    pub fn unit_amount(&self) -> Money {
        self.price_data.unit_amount
    }

    /// `unit_amount * quantity`
    pub fn amount(&self) -> Money {
        self.price_data.unit_amount * self.quantity
    }
}

/// Line items ready for the gateway, all in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutPayload {
    pub currency: Currency,
    pub line_items: Vec<CheckoutLineItem>,
}

impl CheckoutPayload {
    /// What the provider will charge for this payload
    pub fn amount_total(&self) -> Money {
        self.line_items.iter().map(CheckoutLineItem::amount).sum()
    }

    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Payload for buying a single item outright (quantity 1, no adjustment)
pub fn build_single_item_payload(item: &Item) -> CheckoutPayload {
    CheckoutPayload {
        currency: item.currency(),
        line_items: vec![CheckoutLineItem::from_item(item, 1)],
    }
}

/// Payload for a full order with discounts and taxes folded in
pub fn build_order_payload(order: &Order) -> Result<CheckoutPayload, BuildError> {
    let currency = order_currency(order)?;

    let mut line_items: Vec<CheckoutLineItem> = order
        .lines()
        .iter()
        .map(CheckoutLineItem::from_order_line)
        .collect();

    let adjustment = pricing::breakdown(order).adjustment();

    debug!(
        order_id = order.id,
        lines = line_items.len(),
        adjustment = adjustment.minor(),
        "building order payload"
    );

    if adjustment > Money::ZERO {
        line_items.push(CheckoutLineItem::adjustment(adjustment, currency));
    } else if adjustment.is_negative() {
        if let Some(first) = line_items.first_mut() {
            let reduced = first.price_data.unit_amount - adjustment.abs();
            first.price_data.unit_amount = reduced.clamp_non_negative();
        }
    }

    Ok(CheckoutPayload {
        currency,
        line_items,
    })
}

/// The single currency shared by every line
fn order_currency(order: &Order) -> Result<Currency, BuildError> {
    let mut currencies = order.lines().iter().map(|line| line.item().currency());
    let expected = currencies.next().ok_or(BuildError::EmptyOrder)?;

    match currencies.find(|c| *c != expected) {
        Some(found) => Err(BuildError::MixedCurrency { expected, found }),
        None => Ok(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Discount, Tax};

    fn item(id: u64, price: i64, currency: Currency) -> Item {
        Item::new(id, format!("Item {id}"), format!("About item {id}"), Money::from_minor(price), currency)
            .unwrap()
    }

    fn usd_order(lines: &[(i64, u32)]) -> Order {
        lines
            .iter()
            .enumerate()
            .fold(Order::new(1), |order, (i, (price, qty))| {
                order.with_item(item(i as u64 + 1, *price, Currency::Usd), *qty).unwrap()
            })
    }

    #[test]
    fn test_single_item_payload() {
        let item = item(7, 4999, Currency::Eur);
        let payload = build_single_item_payload(&item);

        assert_eq!(payload.currency, Currency::Eur);
        assert_eq!(payload.len(), 1);

        let line = &payload.line_items[0];
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_amount(), Money::from_minor(4999));
        assert_eq!(line.price_data.product_data.name, "Item 7");
        assert_eq!(
            line.price_data.product_data.description.as_deref(),
            Some("About item 7")
        );
    }

    #[test]
    fn test_wire_field_names() {
        let payload = build_single_item_payload(&item(1, 1000, Currency::Usd));
        let json = serde_json::to_value(&payload.line_items).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "price_data": {
                    "currency": "usd",
                    "unit_amount": 1000,
                    "product_data": {"name": "Item 1", "description": "About item 1"}
                },
                "quantity": 1
            }])
        );
    }

    #[test]
    fn test_adjustment_line_has_no_description() {
        let order = usd_order(&[(1000, 1)]).with_tax(Tax::new(1, "sales", 10).unwrap());
        let payload = build_order_payload(&order).unwrap();
        let json = serde_json::to_value(&payload.line_items[1]).unwrap();

        assert_eq!(
            json["price_data"]["product_data"],
            serde_json::json!({"name": ADJUSTMENT_LINE_NAME})
        );
    }

    #[test]
    fn test_plain_order_lines() {
        let payload = build_order_payload(&usd_order(&[(1000, 2), (250, 4)])).unwrap();

        assert_eq!(payload.currency, Currency::Usd);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.line_items[0].quantity, 2);
        assert_eq!(payload.line_items[1].unit_amount(), Money::from_minor(250));
        assert_eq!(payload.amount_total(), Money::from_minor(3000));
    }

    #[test]
    fn test_positive_adjustment_appends_line() {
        let order = usd_order(&[(1000, 1)]).with_tax(Tax::new(1, "sales", 10).unwrap());
        let payload = build_order_payload(&order).unwrap();

        assert_eq!(payload.len(), 2);
        let adj = &payload.line_items[1];
        assert_eq!(adj.unit_amount(), Money::from_minor(100));
        assert_eq!(adj.quantity, 1);
        assert_eq!(adj.price_data.currency, Currency::Usd);
        assert_eq!(adj.price_data.product_data.name, ADJUSTMENT_LINE_NAME);
        assert_eq!(payload.amount_total(), order.total());
    }

    #[test]
    fn test_negative_adjustment_reduces_first_line() {
        let order = usd_order(&[(1000, 1)])
            .with_discount(Discount::percent(1, "half", 50).unwrap())
            .with_tax(Tax::new(1, "VAT", 20).unwrap());
        let payload = build_order_payload(&order).unwrap();

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.line_items[0].unit_amount(), Money::from_minor(600));
        assert_eq!(payload.amount_total(), Money::from_minor(600));
    }

    #[test]
    fn test_negative_adjustment_excess_is_absorbed() {
        // subtotal 1500, discount 1200 → total 300, adjustment -1200.
        // First line (500) floors at 0; second line keeps 1000.
        let order = usd_order(&[(500, 1), (1000, 1)])
            .with_discount(Discount::amount(1, "big", Money::from_minor(1200)).unwrap());
        let payload = build_order_payload(&order).unwrap();

        assert_eq!(payload.line_items[0].unit_amount(), Money::ZERO);
        assert_eq!(payload.line_items[1].unit_amount(), Money::from_minor(1000));
        assert_eq!(order.total(), Money::from_minor(300));
    }

    #[test]
    fn test_negative_adjustment_ignores_first_line_quantity() {
        // subtotal 2000, 25% off → total 1500, adjustment -500.
        // The unit amount drops by the full 500, so the provider charges
        // 2 × 500 = 1000 rather than the priced 1500.
        let order = usd_order(&[(1000, 2)])
            .with_discount(Discount::percent(1, "quarter", 25).unwrap());
        let payload = build_order_payload(&order).unwrap();

        assert_eq!(order.total(), Money::from_minor(1500));
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.line_items[0].quantity, 2);
        assert_eq!(payload.line_items[0].unit_amount(), Money::from_minor(500));
        assert_eq!(payload.amount_total(), Money::from_minor(1000));
    }

    #[test]
    fn test_zero_adjustment_unchanged() {
        let order = usd_order(&[(800, 3)]);
        let payload = build_order_payload(&order).unwrap();

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.line_items[0].unit_amount(), Money::from_minor(800));
    }

    #[test]
    fn test_empty_order_fails() {
        assert_eq!(build_order_payload(&Order::new(1)), Err(BuildError::EmptyOrder));
    }

    #[test]
    fn test_mixed_currency_fails() {
        let order = Order::new(1)
            .with_item(item(1, 1000, Currency::Usd), 1)
            .unwrap()
            .with_item(item(2, 1000, Currency::Eur), 1)
            .unwrap();

        assert_eq!(
            build_order_payload(&order),
            Err(BuildError::MixedCurrency {
                expected: Currency::Usd,
                found: Currency::Eur,
            })
        );
    }

    #[test]
    fn test_unit_amounts_never_negative() {
        for amount_off in [0, 300, 999, 1000, 1001, 5000] {
            let order = usd_order(&[(1000, 1), (200, 2)])
                .with_discount(Discount::amount(1, "x", Money::from_minor(amount_off)).unwrap())
                .with_tax(Tax::new(1, "t", 5).unwrap());
            let payload = build_order_payload(&order).unwrap();
            assert!(payload.line_items.iter().all(|l| !l.unit_amount().is_negative()));
        }
    }
}
