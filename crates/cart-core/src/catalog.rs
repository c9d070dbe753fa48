//! # Catalog Types
//!
//! Items, discounts and taxes as supplied by the persistence layer.
//!
//! Every record goes through a validated constructor, including when it is
//! deserialized, so an invalid item or a discount with both (or neither) of
//! `percent_off`/`amount_off` can never reach the pricing engine.

use crate::error::ValidationError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest unit amount the provider accepts, in minor units
pub const MAX_UNIT_AMOUNT: i64 = 99_999_999;

/// Largest tax rate a record may carry
pub const MAX_TAX_PERCENT: u32 = 1_000;

/// A purchasable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct Item {
    id: u64,
    name: String,
    description: String,
    price: Money,
    currency: Currency,
}

#[derive(Deserialize)]
struct ItemRecord {
    id: u64,
    name: String,
    description: String,
    price: i64,
    #[serde(default)]
    currency: Currency,
}

impl TryFrom<ItemRecord> for Item {
    type Error = ValidationError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        Item::new(
            record.id,
            record.name,
            record.description,
            Money::from_minor(record.price),
            record.currency,
        )
    }
}

impl Item {
    /// Create an item. Name and description are trimmed and must not be
    /// empty; the provider rejects line items without them. The price must
    /// be within `1..=MAX_UNIT_AMOUNT`.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        currency: Currency,
    ) -> Result<Self, ValidationError> {
        let name = non_empty("name", name.into())?;
        let description = non_empty("description", description.into())?;

        if !(1..=MAX_UNIT_AMOUNT).contains(&price.minor()) {
            return Err(ValidationError::InvalidPrice {
                amount: price.minor(),
            });
        }

        Ok(Self {
            id,
            name,
            description,
            price,
            currency,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.name,
            self.currency.as_str().to_uppercase(),
            self.price
        )
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// How a discount reduces the running total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Percentage off, 1..=100
    Percent(u8),
    /// Fixed amount off in minor units, >= 0
    Amount(Money),
}

/// A discount applied to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord", into = "DiscountRecord")]
pub struct Discount {
    id: u64,
    name: String,
    kind: DiscountKind,
}

/// Storage shape: two optional columns, exactly one of which is set
#[derive(Serialize, Deserialize)]
struct DiscountRecord {
    id: u64,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent_off: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount_off: Option<i64>,
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = ValidationError;

    fn try_from(record: DiscountRecord) -> Result<Self, Self::Error> {
        Discount::from_fields(record.id, record.name, record.percent_off, record.amount_off)
    }
}

impl From<Discount> for DiscountRecord {
    fn from(discount: Discount) -> Self {
        let (percent_off, amount_off) = match discount.kind {
            DiscountKind::Percent(p) => (Some(i64::from(p)), None),
            DiscountKind::Amount(a) => (None, Some(a.minor())),
        };
        Self {
            id: discount.id,
            name: discount.name,
            percent_off,
            amount_off,
        }
    }
}

impl Discount {
    /// Percentage discount; `percent` must be within 1..=100
    pub fn percent(id: u64, name: impl Into<String>, percent: i64) -> Result<Self, ValidationError> {
        let percent = u8::try_from(percent)
            .ok()
            .filter(|p| (1..=100).contains(p))
            .ok_or(ValidationError::InvalidPercentOff { percent })?;

        Ok(Self {
            id,
            name: name.into(),
            kind: DiscountKind::Percent(percent),
        })
    }

    /// Fixed-amount discount; `amount` must not be negative
    pub fn amount(id: u64, name: impl Into<String>, amount: Money) -> Result<Self, ValidationError> {
        if amount.is_negative() {
            return Err(ValidationError::InvalidAmountOff {
                amount: amount.minor(),
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            kind: DiscountKind::Amount(amount),
        })
    }

    /// Build from the legacy pair of optional columns
    pub fn from_fields(
        id: u64,
        name: impl Into<String>,
        percent_off: Option<i64>,
        amount_off: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        match (percent_off, amount_off) {
            (Some(p), None) => Discount::percent(id, name, p),
            (None, Some(a)) => Discount::amount(id, name, Money::from_minor(a)),
            _ => Err(ValidationError::AmbiguousDiscount { name }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// Amount this discount takes off `running_total`
    pub fn reduction(&self, running_total: Money) -> Money {
        match self.kind {
            DiscountKind::Percent(p) => running_total.percent(u32::from(p)),
            DiscountKind::Amount(a) => a,
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiscountKind::Percent(p) => write!(f, "{} (-{}%)", self.name, p),
            DiscountKind::Amount(a) => write!(f, "{} (-{})", self.name, a),
        }
    }
}

/// A percentage tax applied to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxRecord")]
pub struct Tax {
    id: u64,
    name: String,
    percent: u32,
}

#[derive(Deserialize)]
struct TaxRecord {
    id: u64,
    name: String,
    percent: i64,
}

impl TryFrom<TaxRecord> for Tax {
    type Error = ValidationError;

    fn try_from(record: TaxRecord) -> Result<Self, Self::Error> {
        Tax::new(record.id, record.name, record.percent)
    }
}

impl Tax {
    pub fn new(id: u64, name: impl Into<String>, percent: i64) -> Result<Self, ValidationError> {
        let percent = u32::try_from(percent)
            .ok()
            .filter(|p| (1..=MAX_TAX_PERCENT).contains(p))
            .ok_or(ValidationError::InvalidTaxPercent { percent })?;

        Ok(Self {
            id,
            name: name.into(),
            percent,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// Amount this tax adds on top of `running_total`
    pub fn charge(&self, running_total: Money) -> Money {
        running_total.percent(self.percent)
    }
}

impl fmt::Display for Tax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{}%)", self.name, self.percent)
    }
}
