//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Views return JSON; the storefront renders them and redirects to the
//! hosted checkout with the returned session id.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use cart_core::{
    breakdown, checkout_item, checkout_order, CheckoutError, Currency, Item, Money, Order,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Number of items listed on the home view
const FEATURED_ITEMS: usize = 5;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn not_found(what: &str, id: u64) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("{} not found: {}", what, id), 404)),
    )
}

/// Created session, consumed by `stripe.redirectToCheckout({ sessionId })`
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
}

/// Item page data
#[derive(Debug, Serialize)]
pub struct ItemView<'a> {
    pub item: &'a Item,
    pub stripe_public_key: &'a str,
}

/// Order page data
#[derive(Debug, Serialize)]
pub struct OrderView<'a> {
    pub order: &'a Order,
    pub currency: Currency,
    pub subtotal: Money,
    pub discounted: Money,
    pub total: Money,
    pub stripe_public_key: &'a str,
}

/// Query string on the success redirect
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "stripe-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Home: the first few items by id
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let items: Vec<&Item> = state.store.featured_items(FEATURED_ITEMS).collect();
    Json(serde_json::json!({
        "items": items,
        "count": items.len()
    }))
}

/// Item page: the item plus the publishable key for its currency
#[instrument(skip(state))]
pub async fn item_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.store.item(id).ok_or_else(|| not_found("Item", id))?;
    let keys = state
        .keys
        .for_currency(item.currency())
        .map_err(|e| checkout_error_to_response(e.into()))?;

    Ok(Json(ItemView {
        item,
        stripe_public_key: &keys.public_key,
    })
    .into_response())
}

/// Create a checkout session for one unit of an item
#[instrument(skip(state))]
pub async fn buy_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SessionResponse>, ApiError> {
    let item = state.store.item(id).ok_or_else(|| not_found("Item", id))?;

    let session = checkout_item(state.gateway.as_ref(), &state.keys, &state.urls, item)
        .await
        .map_err(|e| {
            error!("Failed to create checkout for item {}: {}", id, e);
            checkout_error_to_response(e)
        })?;

    info!("Created checkout session {} for item {}", session.id, id);
    Ok(Json(SessionResponse { id: session.id }))
}

/// Order page: lines, discounts, taxes and the priced totals
#[instrument(skip(state))]
pub async fn order_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.store.order(id).ok_or_else(|| not_found("Order", id))?;

    let currency = order.display_currency();
    let keys = state
        .keys
        .for_currency(currency)
        .map_err(|e| checkout_error_to_response(e.into()))?;
    let prices = breakdown(order);

    Ok(Json(OrderView {
        order,
        currency,
        subtotal: prices.subtotal,
        discounted: prices.discounted,
        total: prices.total,
        stripe_public_key: &keys.public_key,
    })
    .into_response())
}

/// Create a checkout session for a whole order
#[instrument(skip(state))]
pub async fn buy_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SessionResponse>, ApiError> {
    let order = state.store.order(id).ok_or_else(|| not_found("Order", id))?;

    let session = checkout_order(state.gateway.as_ref(), &state.keys, &state.urls, order)
        .await
        .map_err(|e| {
            error!("Failed to create checkout for order {}: {}", id, e);
            checkout_error_to_response(e)
        })?;

    info!("Created checkout session {} for order {}", session.id, id);
    Ok(Json(SessionResponse { id: session.id }))
}

/// Checkout success page
pub async fn checkout_success(Query(query): Query<SuccessQuery>) -> impl IntoResponse {
    let session_id = query.session_id.as_deref().unwrap_or("unknown");
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body style="font-family: system-ui; text-align: center; padding: 60px;">
    <h1>Payment Successful!</h1>
    <p>Session: <code>{}</code></p>
</body>
</html>
"#,
        escape_html(session_id)
    ))
}

/// Checkout cancel page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; text-align: center; padding: 60px;">
    <h1>Payment Cancelled</h1>
    <p>No charges were made.</p>
</body>
</html>
"#,
    )
}

fn escape_html(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}
