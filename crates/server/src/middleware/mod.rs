//! HTTP middleware stack for the wishlist server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id`, `shop`, `customer_id` fields)
//! 3. Request ID (reuse or generate, echo on response)
//!
//! App Proxy authentication is not a layer: it is the
//! [`RequireProxyCustomer`] extractor on each wishlist handler, so
//! unauthenticated routes such as `/health` never see it.

pub mod app_proxy;
pub mod request_id;

pub use app_proxy::RequireProxyCustomer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
