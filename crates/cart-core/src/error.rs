//! # Checkout Error Types
//!
//! Typed error handling for the pricing and checkout engine.
//! Each stage has its own error enum; `CheckoutError` wraps them all
//! for callers that drive a full checkout.

use crate::money::Currency;
use thiserror::Error;

/// Input validation failures for catalog records and order lines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Item price outside what the provider accepts for a unit amount
    #[error("Invalid price: {amount} (must be 1..={max})", max = crate::catalog::MAX_UNIT_AMOUNT)]
    InvalidPrice { amount: i64 },

    /// Discount percent outside 1..=100
    #[error("Invalid percent_off: {percent} (must be 1..=100)")]
    InvalidPercentOff { percent: i64 },

    /// Discount amount below zero
    #[error("Invalid amount_off: {amount} (must be >= 0)")]
    InvalidAmountOff { amount: i64 },

    /// Discount with both or neither of percent_off/amount_off
    #[error("Discount {name:?} must set exactly one of percent_off or amount_off")]
    AmbiguousDiscount { name: String },

    /// Tax percent outside 1..=MAX_TAX_PERCENT
    #[error("Invalid tax percent: {percent} (must be 1..={max})", max = crate::catalog::MAX_TAX_PERCENT)]
    InvalidTaxPercent { percent: i64 },

    /// Order line quantity outside 1..=MAX_QUANTITY
    #[error("Invalid quantity: {quantity} (must be 1..={max})", max = crate::order::MAX_QUANTITY)]
    InvalidQuantity { quantity: u32 },

    /// Currency code we do not know about
    #[error("Unknown currency: {code}")]
    UnknownCurrency { code: String },
}

/// Failures while assembling a provider payload for an order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Order is empty")]
    EmptyOrder,

    #[error("Mixed currencies in one order are not supported: expected {expected}, found {found}")]
    MixedCurrency { expected: Currency, found: Currency },
}

/// Failures while looking up provider keys for a currency
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: Currency },

    #[error("Stripe keys are not set for currency={currency}")]
    MissingCredentials { currency: Currency },
}

/// Opaque failure from the hosted-checkout provider.
///
/// Transport errors, non-2xx responses and unreadable bodies all collapse
/// into this single value. It is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Provider error [{provider}]: {message}")]
pub struct GatewayError {
    pub provider: String,
    pub message: String,
}

impl GatewayError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Umbrella error for a full checkout (lookup, build, provider call)
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 400,
            CheckoutError::Build(_) => 400,
            CheckoutError::Credentials(CredentialsError::UnsupportedCurrency { .. }) => 400,
            CheckoutError::Credentials(CredentialsError::MissingCredentials { .. }) => 500,
            CheckoutError::Gateway(_) => 502,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
