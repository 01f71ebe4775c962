//! Wishlist repository for database operations.
//!
//! Every query is scoped to the shop and customer of a [`VerifiedRequest`].
//! The one consistency rule, at most one row per
//! `(shop_domain, customer_id, product_id, variant_id)`, is enforced by a
//! unique index; concurrent adds of the same tuple are settled by `SQLite`
//! and never by locks in this process.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use wishlist_proxy_core::{CustomerId, ShopDomain, VerifiedRequest};

use super::RepositoryError;
use crate::models::{NewWishlistItem, WishlistItem};

/// Raw `wishlist_item` row.
#[derive(sqlx::FromRow)]
struct WishlistItemRow {
    shop_domain: String,
    customer_id: CustomerId,
    product_id: String,
    variant_id: String,
    handle: String,
    title: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WishlistItemRow> for WishlistItem {
    type Error = RepositoryError;

    fn try_from(row: WishlistItemRow) -> Result<Self, Self::Error> {
        let shop_domain = ShopDomain::parse(&row.shop_domain).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid shop domain in database: {e}"))
        })?;

        Ok(Self {
            shop_domain,
            customer_id: row.customer_id,
            product_id: row.product_id,
            variant_id: row.variant_id,
            handle: row.handle,
            title: row.title,
            image: row.image,
            created_at: row.created_at,
        })
    }
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the caller's entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored shop domain is invalid.
    #[instrument(skip(self, scope), fields(shop = %scope.shop_domain(), customer_id = %scope.customer_id()))]
    pub async fn list(&self, scope: &VerifiedRequest) -> Result<Vec<WishlistItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistItemRow>(
            r"
            SELECT shop_domain, customer_id, product_id, variant_id,
                   handle, title, image, created_at
            FROM wishlist_item
            WHERE shop_domain = ? AND customer_id = ?
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(scope.shop_domain().as_str())
        .bind(scope.customer_id())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(WishlistItem::try_from).collect()
    }

    /// Save an entry unless the same product/variant is already saved.
    ///
    /// Returns `true` if a row was created, `false` if it already existed.
    /// A uniqueness conflict is the "already saved" case, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` for any other database failure.
    #[instrument(
        skip(self, scope, item),
        fields(
            shop = %scope.shop_domain(),
            customer_id = %scope.customer_id(),
            product_id = %item.product_id,
            variant_id = %item.variant_id,
        )
    )]
    pub async fn add(
        &self,
        scope: &VerifiedRequest,
        item: &NewWishlistItem,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO wishlist_item
                (shop_domain, customer_id, product_id, variant_id, handle, title, image)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (shop_domain, customer_id, product_id, variant_id) DO NOTHING
            ",
        )
        .bind(scope.shop_domain().as_str())
        .bind(scope.customer_id())
        .bind(&item.product_id)
        .bind(&item.variant_id)
        .bind(&item.handle)
        .bind(&item.title)
        .bind(&item.image)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete the entry for a product/variant.
    ///
    /// A missing `variant_id` means the empty variant. Returns `true` if a
    /// row was deleted, `false` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip(self, scope), fields(shop = %scope.shop_domain(), customer_id = %scope.customer_id()))]
    pub async fn remove(
        &self,
        scope: &VerifiedRequest,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM wishlist_item
            WHERE shop_domain = ? AND customer_id = ? AND product_id = ? AND variant_id = ?
            ",
        )
        .bind(scope.shop_domain().as_str())
        .bind(scope.customer_id())
        .bind(product_id)
        .bind(variant_id.unwrap_or_default())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of entries the caller has saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, scope: &VerifiedRequest) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM wishlist_item WHERE shop_domain = ? AND customer_id = ?",
        )
        .bind(scope.shop_domain().as_str())
        .bind(scope.customer_id())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
