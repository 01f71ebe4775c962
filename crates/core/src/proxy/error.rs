//! App Proxy authentication errors.

use thiserror::Error;

/// Why a proxied request could not be authenticated.
///
/// Messages are deliberately generic: none of them carries the canonical
/// string, the shared secret, or either computed digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProxyAuthError {
    /// The request carried no `signature` parameter.
    #[error("missing signature")]
    MissingSignature,

    /// The supplied signature matched neither digest.
    #[error("invalid signature")]
    InvalidSignature,

    /// The signed parameters did not name a shop.
    #[error("missing shop")]
    MissingShop,

    /// The visitor is not logged into the storefront.
    #[error("customer is not logged in")]
    Unauthenticated,

    /// `logged_in_customer_id` is present but not a non-negative integer.
    #[error("malformed customer id")]
    MalformedCustomerId,
}

impl ProxyAuthError {
    /// Whether the failure came from signature verification rather than
    /// identity resolution.
    #[must_use]
    pub const fn is_signature_failure(&self) -> bool {
        matches!(self, Self::MissingSignature | Self::InvalidSignature)
    }
}
