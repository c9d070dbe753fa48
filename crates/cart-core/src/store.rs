//! # Snapshot Store
//!
//! Read-only items and orders loaded from `config/store.toml`.
//! Order records reference items, discounts and taxes by id; references are
//! resolved once at load time into self-contained `Order` snapshots.
//!
//! ```toml
//! [[items]]
//! id = 1
//! name = "Notebook"
//! description = "A5 dotted"
//! price = 1000
//! currency = "usd"
//!
//! [[discounts]]
//! id = 1
//! name = "Spring sale"
//! percent_off = 10
//!
//! [[taxes]]
//! id = 1
//! name = "VAT"
//! percent = 20
//!
//! [[orders]]
//! id = 1
//! discounts = [1]
//! taxes = [1]
//! lines = [{ item = 1, quantity = 2 }]
//! ```

use crate::catalog::{Discount, Item, Tax};
use crate::error::ValidationError;
use crate::order::{Order, OrderLine};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures while loading a store snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to parse store: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u64 },

    #[error("Order {order} references unknown {kind} {id}")]
    UnknownReference {
        order: u64,
        kind: &'static str,
        id: u64,
    },

    #[error("Order {order} has an invalid line: {source}")]
    InvalidLine {
        order: u64,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    discounts: Vec<Discount>,
    #[serde(default)]
    taxes: Vec<Tax>,
    #[serde(default)]
    orders: Vec<OrderRecord>,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    id: u64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    lines: Vec<LineRecord>,
    #[serde(default)]
    discounts: Vec<u64>,
    #[serde(default)]
    taxes: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct LineRecord {
    item: u64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Resolved catalog and orders
#[derive(Debug, Clone, Default)]
pub struct Store {
    items: BTreeMap<u64, Item>,
    orders: BTreeMap<u64, Order>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and resolve a store from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, StoreError> {
        let file: StoreFile = toml::from_str(toml_str)?;

        let items = index_by_id("item", file.items, Item::id)?;
        let discounts = index_by_id("discount", file.discounts, Discount::id)?;
        let taxes = index_by_id("tax", file.taxes, Tax::id)?;

        let mut orders = BTreeMap::new();
        for record in file.orders {
            let id = record.id;
            let order = resolve_order(record, &items, &discounts, &taxes)?;
            if orders.insert(id, order).is_some() {
                return Err(StoreError::DuplicateId { kind: "order", id });
            }
        }

        Ok(Self { items, orders })
    }

    /// Builder: add an item, replacing any with the same id
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.id(), item);
        self
    }

    /// Builder: add an order, replacing any with the same id
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.insert(order.id, order);
        self
    }

    pub fn item(&self, id: u64) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn order(&self, id: u64) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// First `limit` items by id
    pub fn featured_items(&self, limit: usize) -> impl Iterator<Item = &Item> {
        self.items.values().take(limit)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

fn index_by_id<T>(
    kind: &'static str,
    records: Vec<T>,
    id_of: fn(&T) -> u64,
) -> Result<BTreeMap<u64, T>, StoreError> {
    let mut index = BTreeMap::new();
    for record in records {
        let id = id_of(&record);
        if index.insert(id, record).is_some() {
            return Err(StoreError::DuplicateId { kind, id });
        }
    }
    Ok(index)
}

fn resolve_order(
    record: OrderRecord,
    items: &BTreeMap<u64, Item>,
    discounts: &BTreeMap<u64, Discount>,
    taxes: &BTreeMap<u64, Tax>,
) -> Result<Order, StoreError> {
    let order_id = record.id;
    let unknown = |kind: &'static str, id: u64| StoreError::UnknownReference {
        order: order_id,
        kind,
        id,
    };

    let mut order = Order::with_timestamp(order_id, record.created_at.unwrap_or_else(Utc::now));

    for line in record.lines {
        let item = items.get(&line.item).ok_or_else(|| unknown("item", line.item))?;
        let line = OrderLine::new(item.clone(), line.quantity).map_err(|source| {
            StoreError::InvalidLine {
                order: order_id,
                source,
            }
        })?;
        order.add_line(line);
    }

    for id in record.discounts {
        let discount = discounts.get(&id).ok_or_else(|| unknown("discount", id))?;
        order.apply_discount(discount.clone());
    }

    for id in record.taxes {
        let tax = taxes.get(&id).ok_or_else(|| unknown("tax", id))?;
        order.apply_tax(tax.clone());
    }

    Ok(order)
}
