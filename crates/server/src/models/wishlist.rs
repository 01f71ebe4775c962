//! Wishlist domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wishlist_proxy_core::{CustomerId, ShopDomain};

/// One favorited product (or product variant) of one customer in one shop.
///
/// Entries are never updated: they are inserted once and eventually deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishlistItem {
    /// Tenant the entry belongs to.
    #[serde(skip)]
    pub shop_domain: ShopDomain,
    /// Customer who saved the entry.
    #[serde(skip)]
    pub customer_id: CustomerId,
    /// Opaque catalog product id.
    pub product_id: String,
    /// Opaque variant id; empty means "no specific variant".
    pub variant_id: String,
    /// Product handle (display metadata).
    pub handle: String,
    /// Product title (display metadata).
    pub title: String,
    /// Product image URL (display metadata).
    pub image: String,
    /// When the entry was saved.
    pub created_at: DateTime<Utc>,
}

/// Data for a new wishlist entry.
///
/// Scope (shop and customer) comes from the authenticated request, never
/// from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWishlistItem {
    pub product_id: String,
    pub variant_id: String,
    pub handle: String,
    pub title: String,
    pub image: String,
}

impl NewWishlistItem {
    /// A new entry for `product_id` with no variant and no display metadata.
    #[must_use]
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            ..Self::default()
        }
    }

    /// Set the variant id.
    #[must_use]
    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = variant_id.into();
        self
    }
}
