//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the store snapshot, provider keys, the checkout gateway and
//! configuration. Everything is immutable after startup.

use anyhow::Context;
use cart_core::{CheckoutUrls, KeyRing, SharedGateway, Store};
use cart_stripe::{StripeCheckoutGateway, StripeConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Store locations tried when `STORE_PATH` is not set
const STORE_SEARCH_PATHS: [&str; 3] = [
    "config/store.toml",
    "../config/store.toml",
    "../../config/store.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public origin used for success/cancel redirects
    pub domain: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit store snapshot path
    pub store_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            domain: lookup("DOMAIN").unwrap_or_else(|| "http://localhost:8080".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            store_path: lookup("STORE_PATH").map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Success/cancel redirect URLs for this deployment
    pub fn checkout_urls(&self) -> CheckoutUrls {
        CheckoutUrls::for_domain(&self.domain)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Items and orders snapshot
    pub store: Arc<Store>,
    /// Per-currency provider keys
    pub keys: Arc<KeyRing>,
    /// Hosted-checkout provider
    pub gateway: SharedGateway,
    /// Success/cancel redirects
    pub urls: Arc<CheckoutUrls>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the Stripe gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let store = load_store(&config)?;

        let stripe = StripeConfig::from_env().context("Failed to load Stripe config")?;
        let gateway =
            StripeCheckoutGateway::new(&stripe).context("Failed to initialize Stripe")?;

        Ok(Self::from_parts(config, store, stripe.keys, Arc::new(gateway)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        store: Store,
        keys: KeyRing,
        gateway: SharedGateway,
    ) -> Self {
        Self {
            urls: Arc::new(config.checkout_urls()),
            store: Arc::new(store),
            keys: Arc::new(keys),
            gateway,
            config: Arc::new(config),
        }
    }
}

/// Load the store snapshot from `STORE_PATH` or the default locations
fn load_store(config: &AppConfig) -> anyhow::Result<Store> {
    if let Some(path) = &config.store_path {
        return read_store(path);
    }

    for path in STORE_SEARCH_PATHS {
        let path = Path::new(path);
        if path.exists() {
            return read_store(path);
        }
    }

    tracing::warn!("No store snapshot found, using empty store");
    Ok(Store::new())
}

fn read_store(path: &Path) -> anyhow::Result<Store> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let store = Store::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!(
        "Loaded {} items and {} orders from {}",
        store.item_count(),
        store.order_count(),
        path.display()
    );
    Ok(store)
}
