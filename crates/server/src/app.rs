//! Router assembly.

use axum::{Router, extract::Request, middleware};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::middleware::request_id_middleware;
use crate::routes;
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            // Only the path is logged: the query string carries the signature.
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = Empty,
                    shop = Empty,
                    customer_id = Empty,
                )
            }),
        )
        .with_state(state)
}
