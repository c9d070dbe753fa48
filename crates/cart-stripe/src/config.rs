//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! Each currency settles through its own Stripe account, so keys are read
//! per currency:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `STRIPE_PUBLIC_KEY_USD` / `STRIPE_SECRET_KEY_USD` | USD account keys |
//! | `STRIPE_PUBLIC_KEY_EUR` / `STRIPE_SECRET_KEY_EUR` | EUR account keys |
//! | `STRIPE_API_BASE` | API base URL override (tests, proxies) |
//!
//! A currency is registered as soon as either of its variables is present.
//! Blank values are kept and reported as missing credentials at checkout.

use cart_core::{Currency, CurrencyKeys, KeyRing};
use std::env;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Errors while reading Stripe configuration
#[derive(Debug, Error)]
pub enum StripeConfigError {
    #[error("{var} must start with {expected}")]
    InvalidKeyFormat { var: String, expected: &'static str },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Per-currency key pairs
    pub keys: KeyRing,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, StripeConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StripeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys = KeyRing::new();

        for currency in Currency::ALL {
            let code = currency.as_str().to_uppercase();
            let public_var = format!("STRIPE_PUBLIC_KEY_{}", code);
            let secret_var = format!("STRIPE_SECRET_KEY_{}", code);

            let public_key = lookup(&public_var);
            let secret_key = lookup(&secret_var);

            if public_key.is_none() && secret_key.is_none() {
                continue;
            }

            let public_key = public_key.unwrap_or_default();
            let secret_key = secret_key.unwrap_or_default();

            check_prefix(&public_var, &public_key, "pk_")?;
            check_prefix(&secret_var, &secret_key, "sk_")?;

            if public_key.is_empty() || secret_key.is_empty() {
                warn!("Stripe keys for {} are incomplete", currency);
            }

            keys.insert(currency, CurrencyKeys::new(public_key, secret_key));
        }

        if keys.is_empty() {
            warn!("No Stripe keys configured; every checkout will fail");
        }

        Ok(Self {
            keys,
            api_base_url: lookup("STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Create config with explicit keys (for testing)
    pub fn new(keys: KeyRing) -> Self {
        Self {
            keys,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Blank values pass; they surface later as missing credentials
fn check_prefix(var: &str, value: &str, expected: &'static str) -> Result<(), StripeConfigError> {
    if value.is_empty() || value.starts_with(expected) {
        return Ok(());
    }
    Err(StripeConfigError::InvalidKeyFormat {
        var: var.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::CredentialsError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_per_currency_keys() {
        let config = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_PUBLIC_KEY_USD", "pk_test_usd"),
            ("STRIPE_SECRET_KEY_USD", "sk_test_usd"),
        ]))
        .unwrap();

        let usd = config.keys.for_currency(Currency::Usd).unwrap();
        assert_eq!(usd.public_key, "pk_test_usd");
        assert_eq!(
            config.keys.for_currency(Currency::Eur),
            Err(CredentialsError::UnsupportedCurrency {
                currency: Currency::Eur
            })
        );
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_blank_keys_are_registered_as_missing() {
        let config = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_PUBLIC_KEY_EUR", "pk_test_eur"),
            ("STRIPE_SECRET_KEY_EUR", ""),
        ]))
        .unwrap();

        assert_eq!(
            config.keys.for_currency(Currency::Eur),
            Err(CredentialsError::MissingCredentials {
                currency: Currency::Eur
            })
        );
    }

    #[test]
    fn test_key_format_validation() {
        let err = StripeConfig::from_lookup(lookup_from(&[
            ("STRIPE_PUBLIC_KEY_USD", "sk_test_swapped"),
            ("STRIPE_SECRET_KEY_USD", "pk_test_swapped"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "STRIPE_PUBLIC_KEY_USD must start with pk_");
    }

    #[test]
    fn test_api_base_override() {
        let config =
            StripeConfig::from_lookup(lookup_from(&[("STRIPE_API_BASE", "http://127.0.0.1:12111")]))
                .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:12111");
        assert!(config.keys.is_empty());
    }
}
