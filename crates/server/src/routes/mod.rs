//! HTTP route handlers for the wishlist server.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health          - Liveness probe (unauthenticated)
//! GET    /health/ready    - Readiness probe, checks the database (unauthenticated)
//!
//! # Wishlist (signed App Proxy requests from a logged-in customer)
//! GET    /wishlist        - List saved items, newest first
//! POST   /wishlist        - Save an item (JSON body)
//! DELETE /wishlist        - Remove an item (`product_id`, `variant_id` in the query)
//! ```
//!
//! The wishlist routes are also mounted under `/apps/wishlist`, the path the
//! App Proxy forwards when the proxy URL is configured with its sub-path.

pub mod health;
pub mod wishlist;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(wishlist::list)
            .post(wishlist::add)
            .delete(wishlist::remove),
    )
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/apps/wishlist", wishlist_routes())
}
