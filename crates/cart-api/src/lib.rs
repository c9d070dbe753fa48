//! # cart-api
//!
//! HTTP API layer for stripe-cart.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - JSON views for items and orders
//! - Checkout endpoints returning a hosted-checkout session id
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/` | First five items |
//! | GET | `/item/{id}` | Item with publishable key |
//! | GET | `/buy/{id}` | Checkout session for one item |
//! | GET | `/order/{id}` | Order with subtotal and total |
//! | GET | `/buy-order/{id}` | Checkout session for an order |
//! | GET | `/success`, `/cancel` | Redirect targets |
//!
//! Errors are always JSON: `{"error": "...", "code": 400}`.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
