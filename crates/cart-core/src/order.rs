//! # Order Types
//!
//! A read-only order snapshot: lines plus the discounts and taxes applied
//! to it. Discounts and taxes are sets keyed by id and are always iterated
//! in ascending id order, so stacked percentages price deterministically.

use crate::catalog::{Discount, Item, Tax};
use crate::error::ValidationError;
use crate::money::{Currency, Money};
use crate::pricing;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Largest quantity the provider accepts on one line
pub const MAX_QUANTITY: u32 = 999_999;

/// One item in an order with its quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    item: Item,
    quantity: u32,
}

impl OrderLine {
    pub fn new(item: Item, quantity: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(ValidationError::InvalidQuantity { quantity });
        }
        Ok(Self { item, quantity })
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity`
    pub fn line_total(&self) -> Money {
        self.item.price() * self.quantity
    }
}

impl fmt::Display for OrderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.item, self.quantity)
    }
}

/// An order to be priced and checked out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
    discounts: Vec<Discount>,
    taxes: Vec<Tax>,
}

impl Order {
    /// Create an empty order stamped with the current time
    pub fn new(id: u64) -> Self {
        Self::with_timestamp(id, Utc::now())
    }

    pub fn with_timestamp(id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            lines: Vec::new(),
            discounts: Vec::new(),
            taxes: Vec::new(),
        }
    }

    /// Append a line. Currency consistency is checked when the payload is
    /// built, not here.
    pub fn add_line(&mut self, line: OrderLine) {
        self.lines.push(line);
    }

    /// Add an item with quantity
    pub fn add_item(&mut self, item: Item, quantity: u32) -> Result<(), ValidationError> {
        self.add_line(OrderLine::new(item, quantity)?);
        Ok(())
    }

    /// Apply a discount. Re-applying the same id replaces the previous one.
    pub fn apply_discount(&mut self, discount: Discount) {
        match self.discounts.binary_search_by_key(&discount.id(), Discount::id) {
            Ok(pos) => self.discounts[pos] = discount,
            Err(pos) => self.discounts.insert(pos, discount),
        }
    }

    /// Apply a tax. Re-applying the same id replaces the previous one.
    pub fn apply_tax(&mut self, tax: Tax) {
        match self.taxes.binary_search_by_key(&tax.id(), Tax::id) {
            Ok(pos) => self.taxes[pos] = tax,
            Err(pos) => self.taxes.insert(pos, tax),
        }
    }

    /// Builder: add an item
    pub fn with_item(mut self, item: Item, quantity: u32) -> Result<Self, ValidationError> {
        self.add_item(item, quantity)?;
        Ok(self)
    }

    /// Builder: apply a discount
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.apply_discount(discount);
        self
    }

    /// Builder: apply a tax
    pub fn with_tax(mut self, tax: Tax) -> Self {
        self.apply_tax(tax);
        self
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Applied discounts in ascending id order
    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    /// Applied taxes in ascending id order
    pub fn taxes(&self) -> &[Tax] {
        &self.taxes
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across lines
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Currency of the first line, `usd` for an empty order
    pub fn display_currency(&self) -> Currency {
        self.lines
            .first()
            .map(|line| line.item().currency())
            .unwrap_or_default()
    }

    pub fn subtotal(&self) -> Money {
        pricing::subtotal(self)
    }

    pub fn total(&self) -> Money {
        pricing::total(self)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}
