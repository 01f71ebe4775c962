//! Resolving the shop and customer behind a verified request.

use crate::types::{CustomerId, ShopDomain};

use super::error::ProxyAuthError;
use super::params::{CUSTOMER_ID_PARAM, ProxyParams, SHOP_PARAM};

/// The authenticated caller of a proxied request.
///
/// Only produced by [`ProxyRequest::resolve_identity`](super::ProxyRequest),
/// i.e. after the signature has been checked. It lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    shop_domain: ShopDomain,
    customer_id: CustomerId,
    authentic: bool,
}

impl VerifiedRequest {
    /// The tenant the request was made for.
    #[must_use]
    pub const fn shop_domain(&self) -> &ShopDomain {
        &self.shop_domain
    }

    /// The logged-in customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Whether the request signature verified. Always `true` for a value
    /// obtained through the pipeline.
    #[must_use]
    pub const fn is_authentic(&self) -> bool {
        self.authentic
    }
}

/// Pull the shop and customer out of an already-verified parameter set.
///
/// An empty `logged_in_customer_id` is how the platform marks an anonymous
/// visitor, so it counts as absent.
pub(super) fn extract_identity(params: &ProxyParams) -> Result<VerifiedRequest, ProxyAuthError> {
    let shop_domain = params
        .get(SHOP_PARAM)
        .and_then(|shop| ShopDomain::parse(shop).ok())
        .ok_or(ProxyAuthError::MissingShop)?;

    let raw_customer = params
        .get(CUSTOMER_ID_PARAM)
        .filter(|id| !id.trim().is_empty())
        .ok_or(ProxyAuthError::Unauthenticated)?;

    let customer_id =
        CustomerId::parse(raw_customer).map_err(|_| ProxyAuthError::MalformedCustomerId)?;

    Ok(VerifiedRequest {
        shop_domain,
        customer_id,
        authentic: true,
    })
}
