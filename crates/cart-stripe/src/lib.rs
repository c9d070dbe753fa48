//! # cart-stripe
//!
//! Stripe Checkout gateway for stripe-cart.
//!
//! `StripeCheckoutGateway` implements `cart_core::CheckoutGateway` on top of
//! the Checkout Sessions API. Keys are configured per currency and passed to
//! every call.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_core::{checkout_order, CheckoutUrls};
//! use cart_stripe::{StripeCheckoutGateway, StripeConfig};
//!
//! let config = StripeConfig::from_env()?;
//! let gateway = StripeCheckoutGateway::new(&config)?;
//!
//! let session = checkout_order(
//!     &gateway,
//!     &config.keys,
//!     &CheckoutUrls::for_domain("https://example.com"),
//!     &order,
//! ).await?;
//!
//! // Hand session.id to Stripe.js redirectToCheckout
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutGateway;
pub use config::{StripeConfig, StripeConfigError};
