//! # Checkout Flow
//!
//! Glue between the payload builder, the key ring and a gateway. Build
//! errors are raised before any key lookup or provider call, so a failed
//! checkout never sends a partial payload.

use crate::catalog::Item;
use crate::credentials::KeyRing;
use crate::error::CheckoutResult;
use crate::gateway::{CheckoutGateway, CheckoutSession, CheckoutUrls};
use crate::order::Order;
use crate::payload::{build_order_payload, build_single_item_payload, CheckoutPayload};
use tracing::{error, info, instrument};

/// Buy one unit of a single item
#[instrument(skip_all, fields(item_id = item.id(), currency = %item.currency()))]
pub async fn checkout_item(
    gateway: &dyn CheckoutGateway,
    keys: &KeyRing,
    urls: &CheckoutUrls,
    item: &Item,
) -> CheckoutResult<CheckoutSession> {
    let payload = build_single_item_payload(item);
    submit(gateway, keys, urls, &payload).await
}

/// Buy a whole order with its discounts and taxes
#[instrument(skip_all, fields(order_id = order.id))]
pub async fn checkout_order(
    gateway: &dyn CheckoutGateway,
    keys: &KeyRing,
    urls: &CheckoutUrls,
    order: &Order,
) -> CheckoutResult<CheckoutSession> {
    let payload = build_order_payload(order)?;
    submit(gateway, keys, urls, &payload).await
}

async fn submit(
    gateway: &dyn CheckoutGateway,
    keys: &KeyRing,
    urls: &CheckoutUrls,
    payload: &CheckoutPayload,
) -> CheckoutResult<CheckoutSession> {
    let currency_keys = keys.for_currency(payload.currency)?;

    let session = gateway
        .create_session(currency_keys, payload, urls)
        .await
        .map_err(|e| {
            error!(provider = gateway.provider_name(), "checkout session failed: {}", e);
            e
        })?;

    info!(
        provider = gateway.provider_name(),
        session_id = %session.id,
        lines = payload.len(),
        amount_total = payload.amount_total().minor(),
        "created checkout session"
    );

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Discount, Tax};
    use crate::credentials::CurrencyKeys;
    use crate::error::{BuildError, CheckoutError, CredentialsError, GatewayError};
    use crate::money::{Currency, Money};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every payload and secret it was called with
    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<(String, CheckoutPayload)>>,
        fail: bool,
    }

    #[async_trait]
    impl CheckoutGateway for RecordingGateway {
        async fn create_session(
            &self,
            keys: &CurrencyKeys,
            payload: &CheckoutPayload,
            _urls: &CheckoutUrls,
        ) -> Result<CheckoutSession, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((keys.secret_key.clone(), payload.clone()));
            if self.fail {
                return Err(GatewayError::new("fake", "Invalid API Key provided"));
            }
            Ok(CheckoutSession::new(format!("cs_{}", self.calls.lock().unwrap().len())))
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    fn keys() -> KeyRing {
        KeyRing::new()
            .with_keys(Currency::Usd, CurrencyKeys::new("pk_usd", "sk_usd"))
            .with_keys(Currency::Eur, CurrencyKeys::new("pk_eur", "sk_eur"))
    }

    fn urls() -> CheckoutUrls {
        CheckoutUrls::for_domain("http://localhost:8080")
    }

    fn item(id: u64, price: i64, currency: Currency) -> Item {
        Item::new(id, format!("Item {id}"), "Test item", Money::from_minor(price), currency).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_item_uses_currency_keys() {
        let gateway = RecordingGateway::default();
        let session = checkout_item(&gateway, &keys(), &urls(), &item(1, 900, Currency::Eur))
            .await
            .unwrap();

        assert_eq!(session.id, "cs_1");
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls[0].0, "sk_eur");
        assert_eq!(calls[0].1.line_items[0].unit_amount(), Money::from_minor(900));
    }

    #[tokio::test]
    async fn test_checkout_order_sends_adjusted_payload() {
        let gateway = RecordingGateway::default();
        let order = Order::new(5)
            .with_item(item(1, 1000, Currency::Usd), 1)
            .unwrap()
            .with_discount(Discount::percent(1, "half", 50).unwrap())
            .with_tax(Tax::new(1, "VAT", 20).unwrap());

        checkout_order(&gateway, &keys(), &urls(), &order).await.unwrap();

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls[0].0, "sk_usd");
        assert_eq!(calls[0].1.amount_total(), Money::from_minor(600));
    }

    #[tokio::test]
    async fn test_build_errors_skip_gateway() {
        let gateway = RecordingGateway::default();
        let mixed = Order::new(1)
            .with_item(item(1, 100, Currency::Usd), 1)
            .unwrap()
            .with_item(item(2, 100, Currency::Eur), 1)
            .unwrap();

        let err = checkout_order(&gateway, &keys(), &urls(), &mixed).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Build(BuildError::MixedCurrency { .. })));

        let err = checkout_order(&gateway, &keys(), &urls(), &Order::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Build(BuildError::EmptyOrder)));

        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_keys_skip_gateway() {
        let gateway = RecordingGateway::default();
        let ring = KeyRing::new().with_keys(Currency::Usd, CurrencyKeys::new("", ""));

        let err = checkout_item(&gateway, &ring, &urls(), &item(1, 100, Currency::Usd))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Credentials(CredentialsError::MissingCredentials { .. })
        ));

        let err = checkout_item(&gateway, &ring, &urls(), &item(1, 100, Currency::Eur))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_opaque() {
        let gateway = RecordingGateway {
            fail: true,
            ..Default::default()
        };

        let err = checkout_item(&gateway, &keys(), &urls(), &item(1, 100, Currency::Usd))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.to_string(), "Provider error [fake]: Invalid API Key provided");
    }
}
