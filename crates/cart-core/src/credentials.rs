//! # Provider Credentials
//!
//! Per-currency publishable/secret key pairs. Each provider account settles
//! in one currency, so the keys used for a checkout depend on the currency
//! of the payload. Keys are handed to the gateway per call.

use crate::error::CredentialsError;
use crate::money::Currency;
use std::collections::HashMap;
use std::fmt;

/// Publishable and secret key for one currency's provider account
#[derive(Clone, PartialEq, Eq)]
pub struct CurrencyKeys {
    pub public_key: String,
    pub secret_key: String,
}

impl CurrencyKeys {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    fn is_complete(&self) -> bool {
        !self.public_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

impl fmt::Debug for CurrencyKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyKeys")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Keys for every configured currency
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    keys: HashMap<Currency, CurrencyKeys>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register keys for a currency, replacing any previous pair
    pub fn insert(&mut self, currency: Currency, keys: CurrencyKeys) {
        self.keys.insert(currency, keys);
    }

    /// Builder: register keys for a currency
    pub fn with_keys(mut self, currency: Currency, keys: CurrencyKeys) -> Self {
        self.insert(currency, keys);
        self
    }

    /// Keys for `currency`.
    ///
    /// Fails with `UnsupportedCurrency` when the currency was never
    /// configured and with `MissingCredentials` when either key is blank.
    pub fn for_currency(&self, currency: Currency) -> Result<&CurrencyKeys, CredentialsError> {
        let keys = self
            .keys
            .get(&currency)
            .ok_or(CredentialsError::UnsupportedCurrency { currency })?;

        if !keys.is_complete() {
            return Err(CredentialsError::MissingCredentials { currency });
        }
        Ok(keys)
    }

    /// Configured currencies, in a stable order
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.keys.keys().copied().collect();
        currencies.sort();
        currencies
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
