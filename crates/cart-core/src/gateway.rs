//! # Checkout Gateway Trait
//!
//! Boundary to the hosted-checkout provider. The core builds the payload;
//! an implementation (Stripe, or a fake in tests) turns it into a session.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  CheckoutGateway (trait)                     │
//! │  ├── create_session(keys, payload, urls)                     │
//! │  └── provider_name()                                         │
//! └──────────────────────────────────────────────────────────────┘
//!                              ▲
//!               ┌──────────────┴──────────────┐
//!       ┌───────┴────────┐           ┌────────┴───────┐
//!       │ StripeCheckout │           │  test doubles  │
//!       │    Gateway     │           │                │
//!       └────────────────┘           └────────────────┘
//! ```

use crate::credentials::CurrencyKeys;
use crate::error::GatewayError;
use crate::payload::CheckoutPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder the provider substitutes with the real session id
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// A session created by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub id: String,

    /// Hosted page URL, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CheckoutSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Redirect targets after the hosted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutUrls {
    /// `{domain}/success?session_id={CHECKOUT_SESSION_ID}` and `{domain}/cancel`
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.trim_end_matches('/');
        Self {
            success_url: format!("{}/success?session_id={}", domain, SESSION_ID_PLACEHOLDER),
            cancel_url: format!("{}/cancel", domain),
        }
    }
}

/// Hosted-checkout provider.
///
/// Credentials travel with each call; implementations must not cache them
/// in shared state.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a payment-mode checkout session for `payload`.
    ///
    /// Any failure is reported as a single opaque `GatewayError`.
    async fn create_session(
        &self,
        keys: &CurrencyKeys,
        payload: &CheckoutPayload,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutSession, GatewayError>;

    /// Get the provider name (for logging and errors).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn CheckoutGateway>;
