//! Wishlist Proxy Server - App Proxy backend for customer wishlists.
//!
//! This binary serves the wishlist API the storefront reaches through the
//! platform's App Proxy, on port 3000 by default.
//!
//! # Architecture
//!
//! - Axum web framework, JSON responses
//! - Every wishlist request is authenticated from its App Proxy signature
//!   (`wishlist-proxy-core`), then scoped to the signed shop and customer
//! - `SQLite` via sqlx for storage; a unique index keeps one row per
//!   (shop, customer, product, variant)
//!
//! # Security
//!
//! Requests are trusted only if their query string carries a valid signature
//! made with `SHOPIFY_API_SECRET`. There are no sessions or cookies.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wishlist_proxy_server::app;
use wishlist_proxy_server::config::WishlistConfig;
use wishlist_proxy_server::db;
use wishlist_proxy_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WishlistConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = WishlistConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wishlist_proxy_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::info!(
        signature_mode = %config.proxy.signature_mode,
        "App Proxy verification configured"
    );

    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Migrations normally run via: cargo run -p wishlist-proxy-cli -- migrate
    if config.auto_migrate {
        db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    }

    let state = AppState::new(config.clone(), pool.clone());

    let app = app::router(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("wishlist server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Database pool closed");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
