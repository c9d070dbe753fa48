//! # cart-core
//!
//! Core types for the stripe-cart checkout engine.
//!
//! This crate provides:
//! - `Money` and `Currency` for integer minor-unit amounts
//! - `Item`, `Discount` and `Tax` catalog records (validated on construction)
//! - `Order` snapshots and the pricing engine (`subtotal`, `total`)
//! - The checkout payload builder with the negative-adjustment rule
//! - `CheckoutGateway` trait and per-currency `KeyRing`
//! - `Store` for read-only snapshots loaded from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{build_order_payload, checkout_order, CheckoutUrls, Currency, Item, Money, Order, Tax};
//!
//! let mug = Item::new(1, "Mug", "Ceramic mug", Money::from_minor(1000), Currency::Usd)?;
//! let order = Order::new(1).with_item(mug, 1)?.with_tax(Tax::new(1, "Sales", 10)?);
//!
//! assert_eq!(order.total(), Money::from_minor(1100));
//!
//! // Two lines: the mug and a 100 cent adjustment
//! let payload = build_order_payload(&order)?;
//!
//! let session = checkout_order(&gateway, &keys, &CheckoutUrls::for_domain(domain), &order).await?;
//! ```

pub mod catalog;
pub mod checkout;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod money;
pub mod order;
pub mod payload;
pub mod pricing;
pub mod store;

// Re-exports for convenience
pub use catalog::{Discount, DiscountKind, Item, Tax, MAX_TAX_PERCENT, MAX_UNIT_AMOUNT};
pub use checkout::{checkout_item, checkout_order};
pub use credentials::{CurrencyKeys, KeyRing};
pub use error::{
    BuildError, CheckoutError, CheckoutResult, CredentialsError, GatewayError, ValidationError,
};
pub use gateway::{CheckoutGateway, CheckoutSession, CheckoutUrls, SharedGateway};
pub use money::{Currency, Money};
pub use order::{Order, OrderLine, MAX_QUANTITY};
pub use payload::{
    build_order_payload, build_single_item_payload, CheckoutLineItem, CheckoutPayload, PriceData,
    ProductData, ADJUSTMENT_LINE_NAME,
};
pub use pricing::{breakdown, subtotal, total, PriceBreakdown};
pub use store::{Store, StoreError};
