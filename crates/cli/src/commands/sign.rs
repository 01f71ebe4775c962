//! Request signing command.
//!
//! Produces a query string signed the way the App Proxy signs forwarded
//! requests, for exercising a running server by hand:
//!
//! ```bash
//! wp-cli sign --shop a.myshopify.com --customer 7 --param product_id=123
//! curl -X DELETE "http://127.0.0.1:3000/wishlist?$(wp-cli sign ...)"
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_API_SECRET` - Shared secret (or pass `--secret`)

use secrecy::SecretString;
use thiserror::Error;
use wishlist_proxy_core::{ProxyParams, ProxySigner, SignatureMode};

/// Errors that can occur while signing.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("Invalid --param '{0}': expected key=value")]
    InvalidParam(String),
}

/// Inputs for one signed query string.
#[derive(Debug)]
pub struct SignRequest {
    pub secret: SecretString,
    pub mode: SignatureMode,
    pub shop: String,
    pub customer: Option<String>,
    pub params: Vec<String>,
}

/// Build the signed query string.
///
/// # Errors
///
/// Returns `SignError::InvalidParam` if an extra parameter has no `=`.
pub fn signed_query(request: SignRequest) -> Result<String, SignError> {
    let mut params = ProxyParams::new();
    params.insert("shop", request.shop);
    if let Some(customer) = request.customer {
        params.insert("logged_in_customer_id", customer);
    }
    for raw in request.params {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| SignError::InvalidParam(raw.clone()))?;
        params.append(key, value);
    }

    let signer = ProxySigner::new(request.secret, request.mode);
    Ok(signer.attach_signature(params).to_query_string())
}
