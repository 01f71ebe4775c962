//! App Proxy authentication extractor.
//!
//! Runs the signature check and identity resolution, in that order, before a
//! handler body is entered. Handlers that take [`RequireProxyCustomer`] can
//! only run for a signed request from a logged-in customer.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::Span;
use wishlist_proxy_core::{ProxyRequest, VerifiedRequest};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a signed App Proxy request from a logged-in customer.
///
/// The signature covers every query-string parameter, including ones the
/// storefront added itself (such as `product_id` on a delete).
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireProxyCustomer(caller): RequireProxyCustomer) -> String {
///     format!("customer {} of {}", caller.customer_id(), caller.shop_domain())
/// }
/// ```
pub struct RequireProxyCustomer(pub VerifiedRequest);

impl FromRequestParts<AppState> for RequireProxyCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let verified = ProxyRequest::from_query(query)
            .verify(state.signer())?
            .resolve_identity()?;

        let span = Span::current();
        span.record("shop", verified.shop_domain().as_str());
        span.record("customer_id", verified.customer_id().as_i64());

        sentry::configure_scope(|scope| {
            scope.set_tag("shop", verified.shop_domain());
            scope.set_user(Some(sentry::User {
                id: Some(verified.customer_id().to_string()),
                ..Default::default()
            }));
        });

        Ok(Self(verified))
    }
}
