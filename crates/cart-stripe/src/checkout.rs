//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! Payloads are sent form-encoded in `payment` mode; the secret key comes
//! from the per-call `CurrencyKeys`, never from shared state.

use crate::config::{StripeConfig, StripeConfigError};
use async_trait::async_trait;
use cart_core::{
    CheckoutGateway, CheckoutPayload, CheckoutSession, CheckoutUrls, CurrencyKeys, GatewayError,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session gateway
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeCheckoutGateway {
    client: Client,
    api_base_url: String,
    api_version: String,
}

impl StripeCheckoutGateway {
    /// Create a new Stripe checkout gateway
    pub fn new(config: &StripeConfig) -> Result<Self, StripeConfigError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base_url)
    }
}

/// Build form data for the Stripe API
fn form_params(payload: &CheckoutPayload, urls: &CheckoutUrls) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), urls.success_url.clone()),
        ("cancel_url".to_string(), urls.cancel_url.clone()),
    ];

    for (i, item) in payload.line_items.iter().enumerate() {
        let price = &item.price_data;
        params.push((
            format!("line_items[{}][price_data][currency]", i),
            price.currency.as_str().to_string(),
        ));
        params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            price.unit_amount.minor().to_string(),
        ));
        params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            price.product_data.name.clone(),
        ));
        if let Some(ref desc) = price.product_data.description {
            params.push((
                format!("line_items[{}][price_data][product_data][description]", i),
                desc.clone(),
            ));
        }
        params.push((
            format!("line_items[{}][quantity]", i),
            item.quantity.to_string(),
        ));
    }

    params
}

fn gateway_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(PROVIDER, message)
}

#[async_trait]
impl CheckoutGateway for StripeCheckoutGateway {
    #[instrument(skip_all, fields(currency = %payload.currency, lines = payload.len()))]
    async fn create_session(
        &self,
        keys: &CurrencyKeys,
        payload: &CheckoutPayload,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutSession, GatewayError> {
        let form = form_params(payload, urls);

        debug!(
            "Creating Stripe checkout session: {} items, test_mode={}",
            payload.len(),
            keys.is_test_mode()
        );

        let response = self
            .client
            .post(self.sessions_url())
            .header("Authorization", keys.auth_header())
            .header("Stripe-Version", &self.api_version)
            .form(&form)
            .send()
            .await
            .map_err(|e| gateway_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| gateway_error(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(gateway_error(error_response.error.message));
            }
            return Err(gateway_error(format!("HTTP {}: {}", status, body)));
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| gateway_error(format!("Failed to parse Stripe response: {}", e)))?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
