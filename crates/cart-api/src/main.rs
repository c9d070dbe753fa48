//! # Stripe-Cart
//!
//! Order pricing and hosted-checkout server.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_PUBLIC_KEY_USD=pk_test_...
//! export STRIPE_SECRET_KEY_USD=sk_test_...
//! export DOMAIN=http://localhost:8080
//!
//! # Run the server (LOG_FORMAT=json for structured logs)
//! stripe-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Store loaded: {} items, {} orders",
        state.store.item_count(),
        state.store.order_count()
    );
    info!("Stripe currencies: {:?}", state.keys.currencies());

    let app = routes::create_router(state);

    info!("stripe-cart {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Item checkout:  GET http://{}/buy/{{id}}", addr);
        info!("Order checkout: GET http://{}/buy-order/{{id}}", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
