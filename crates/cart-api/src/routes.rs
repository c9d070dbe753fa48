//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Views:
///   - GET /                 - First items by id
///   - GET /item/{id}        - Item with publishable key
///   - GET /order/{id}       - Order with priced totals
///
/// - Checkout:
///   - GET /buy/{id}         - Session for one item
///   - GET /buy-order/{id}   - Session for a whole order
///
/// - Static pages:
///   - GET /success          - Success page
///   - GET /cancel           - Cancel page
///
/// Item, order and checkout paths also answer with a trailing slash.
pub fn create_router(state: AppState) -> Router {
    // Storefront pages may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let view_routes = Router::new()
        .route("/", get(handlers::home))
        .route("/item/{id}", get(handlers::item_page))
        .route("/item/{id}/", get(handlers::item_page))
        .route("/order/{id}", get(handlers::order_page))
        .route("/order/{id}/", get(handlers::order_page));

    let checkout_routes = Router::new()
        .route("/buy/{id}", get(handlers::buy_item))
        .route("/buy/{id}/", get(handlers::buy_item))
        .route("/buy-order/{id}", get(handlers::buy_order))
        .route("/buy-order/{id}/", get(handlers::buy_order));

    let page_routes = Router::new()
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(view_routes)
        .merge(checkout_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
