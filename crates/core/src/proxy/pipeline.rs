//! Ordered authentication of a proxied request.
//!
//! ```text
//! ProxyRequest<Unverified> --verify--> ProxyRequest<SignatureChecked> --resolve_identity--> VerifiedRequest
//! ```
//!
//! Each stage is its own type, so identity cannot be read before the
//! signature is checked, and anything that needs a [`VerifiedRequest`]
//! cannot run before identity is resolved.

use core::marker::PhantomData;

use super::error::ProxyAuthError;
use super::identity::{VerifiedRequest, extract_identity};
use super::params::ProxyParams;
use super::signature::ProxySigner;

/// Marker: the signature has not been checked.
#[derive(Debug, Clone, Copy)]
pub struct Unverified;

/// Marker: the signature matched.
#[derive(Debug, Clone, Copy)]
pub struct SignatureChecked;

/// A proxied request's parameters at a given authentication stage.
#[derive(Debug, Clone)]
pub struct ProxyRequest<S> {
    params: ProxyParams,
    _stage: PhantomData<S>,
}

impl ProxyRequest<Unverified> {
    /// Wrap an unauthenticated parameter set.
    #[must_use]
    pub const fn new(params: ProxyParams) -> Self {
        Self {
            params,
            _stage: PhantomData,
        }
    }

    /// Wrap the parameters of a raw query string.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::new(ProxyParams::from_query(query))
    }

    /// Check the request signature.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyAuthError::MissingSignature`] or
    /// [`ProxyAuthError::InvalidSignature`].
    pub fn verify(self, signer: &ProxySigner) -> Result<ProxyRequest<SignatureChecked>, ProxyAuthError> {
        signer.verify(&self.params)?;
        Ok(ProxyRequest {
            params: self.params,
            _stage: PhantomData,
        })
    }
}

impl ProxyRequest<SignatureChecked> {
    /// The verified parameters.
    #[must_use]
    pub const fn params(&self) -> &ProxyParams {
        &self.params
    }

    /// Resolve the shop and logged-in customer.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyAuthError::MissingShop`],
    /// [`ProxyAuthError::Unauthenticated`], or
    /// [`ProxyAuthError::MalformedCustomerId`].
    pub fn resolve_identity(&self) -> Result<VerifiedRequest, ProxyAuthError> {
        extract_identity(&self.params)
    }
}

/// Run the full chain over a raw query string.
///
/// # Errors
///
/// Returns the first [`ProxyAuthError`] hit along the chain.
pub fn authenticate(query: &str, signer: &ProxySigner) -> Result<VerifiedRequest, ProxyAuthError> {
    ProxyRequest::from_query(query)
        .verify(signer)?
        .resolve_identity()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::proxy::SignatureMode;

    fn signer() -> ProxySigner {
        ProxySigner::new(SecretString::from("topsecret"), SignatureMode::Sha256)
    }

    fn signed_query(pairs: &[(&str, &str)]) -> String {
        let mut params: ProxyParams = pairs.iter().copied().collect();
        let signature = signer().sign(&params);
        params.insert("signature", signature);
        params.to_query_string()
    }

    #[test]
    fn test_authenticate_signed_customer() {
        let query = signed_query(&[
            ("shop", "a.myshopify.com"),
            ("logged_in_customer_id", "7"),
            ("path_prefix", "/apps/wishlist"),
            ("timestamp", "1700000000"),
        ]);

        let verified = authenticate(&query, &signer()).unwrap();
        assert_eq!(verified.shop_domain().as_str(), "a.myshopify.com");
        assert_eq!(verified.customer_id().as_i64(), 7);
    }

    #[test]
    fn test_signature_checked_before_identity() {
        // Identity is broken too, but the signature failure is reported.
        let query = "logged_in_customer_id=abc&signature=00";
        assert_eq!(
            authenticate(query, &signer()),
            Err(ProxyAuthError::InvalidSignature)
        );
        assert_eq!(
            authenticate("logged_in_customer_id=abc", &signer()),
            Err(ProxyAuthError::MissingSignature)
        );
    }

    #[test]
    fn test_signed_anonymous_visitor() {
        let query = signed_query(&[("shop", "a.myshopify.com"), ("logged_in_customer_id", "")]);
        assert_eq!(
            authenticate(&query, &signer()),
            Err(ProxyAuthError::Unauthenticated)
        );
    }

    #[test]
    fn test_signed_malformed_customer() {
        let query = signed_query(&[("shop", "a.myshopify.com"), ("logged_in_customer_id", "x7")]);
        assert_eq!(
            authenticate(&query, &signer()),
            Err(ProxyAuthError::MalformedCustomerId)
        );
    }

    #[test]
    fn test_signed_without_shop() {
        let query = signed_query(&[("logged_in_customer_id", "7")]);
        assert_eq!(authenticate(&query, &signer()), Err(ProxyAuthError::MissingShop));
    }

    #[test]
    fn test_checked_params_are_exposed() {
        let query = signed_query(&[("shop", "a.myshopify.com"), ("logged_in_customer_id", "7")]);
        let checked = ProxyRequest::from_query(&query).verify(&signer()).unwrap();
        assert_eq!(checked.params().get("shop"), Some("a.myshopify.com"));
    }
}
