//! Wishlist route handlers.
//!
//! All three handlers take [`RequireProxyCustomer`], so by the time a body
//! runs the signature has verified and the caller's shop and customer are
//! known. The store is only reached from here.

use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::instrument;
use wishlist_proxy_core::ProxyParams;

use crate::db::WishlistRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireProxyCustomer;
use crate::models::{NewWishlistItem, WishlistItem};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Response for `GET /wishlist`.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub ok: bool,
    pub items: Vec<WishlistItem>,
}

/// Response for `POST /wishlist`.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub ok: bool,
    pub inserted: bool,
}

/// Response for `DELETE /wishlist`.
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub ok: bool,
    pub removed: bool,
}

/// JSON body of `POST /wishlist`.
///
/// Ids may arrive as strings or as JSON numbers (theme scripts often pass
/// numeric ids straight through); both are stored as strings.
#[derive(Debug, Default, Deserialize)]
pub struct AddItemRequest {
    #[serde(default, deserialize_with = "opt_id")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

fn opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdValue>::deserialize(deserializer)?.map(|id| match id {
        IdValue::Text(s) => s,
        IdValue::Number(n) => n.to_string(),
    }))
}

/// Trim a product id, treating empty as missing.
fn require_product_id(raw: Option<&str>) -> Result<String> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or(AppError::MissingProductId)
}

/// Trim a variant id, treating missing as the empty variant.
fn normalize_variant_id(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_owned()
}

impl AddItemRequest {
    /// Parse a `POST` body. An empty body counts as `{}`; anything other
    /// than a JSON object is rejected.
    fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?;
        if !value.is_object() {
            return Err(AppError::BadRequest(
                "request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
    }

    fn into_new_item(self) -> Result<NewWishlistItem> {
        Ok(NewWishlistItem {
            product_id: require_product_id(self.product_id.as_deref())?,
            variant_id: normalize_variant_id(self.variant_id.as_deref()),
            handle: self.handle.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /wishlist - List the caller's saved items, newest first.
#[instrument(skip(state, caller), fields(shop = %caller.shop_domain(), customer_id = %caller.customer_id()))]
pub async fn list(
    RequireProxyCustomer(caller): RequireProxyCustomer,
    State(state): State<AppState>,
) -> Result<Json<ListResponse>> {
    let items = WishlistRepository::new(state.pool()).list(&caller).await?;

    tracing::debug!(count = items.len(), "Listed wishlist");

    Ok(Json(ListResponse { ok: true, items }))
}

/// POST /wishlist - Save an item.
///
/// Saving an item that is already saved succeeds with `inserted: false`.
#[instrument(skip(state, caller, body), fields(shop = %caller.shop_domain(), customer_id = %caller.customer_id()))]
pub async fn add(
    RequireProxyCustomer(caller): RequireProxyCustomer,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AddResponse>> {
    let item = AddItemRequest::from_body(&body)?.into_new_item()?;

    let inserted = WishlistRepository::new(state.pool())
        .add(&caller, &item)
        .await?;

    add_breadcrumb(
        "wishlist",
        if inserted { "Item added" } else { "Item already saved" },
        &[
            ("product_id", item.product_id.as_str()),
            ("variant_id", item.variant_id.as_str()),
        ],
    );
    tracing::info!(
        product_id = %item.product_id,
        variant_id = %item.variant_id,
        inserted,
        "Wishlist add"
    );

    Ok(Json(AddResponse { ok: true, inserted }))
}

/// DELETE /wishlist - Remove an item.
///
/// `product_id` and `variant_id` come from the same (signed) query string as
/// the App Proxy parameters. Removing an item that is not saved succeeds with
/// `removed: false`.
#[instrument(skip(state, caller, query), fields(shop = %caller.shop_domain(), customer_id = %caller.customer_id()))]
pub async fn remove(
    RequireProxyCustomer(caller): RequireProxyCustomer,
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<RemoveResponse>> {
    let params = ProxyParams::from_query(query.as_deref().unwrap_or_default());
    let product_id = require_product_id(params.get("product_id"))?;
    let variant_id = normalize_variant_id(params.get("variant_id"));

    let removed = WishlistRepository::new(state.pool())
        .remove(&caller, &product_id, Some(variant_id.as_str()))
        .await?;

    add_breadcrumb(
        "wishlist",
        if removed { "Item removed" } else { "Item was not saved" },
        &[
            ("product_id", product_id.as_str()),
            ("variant_id", variant_id.as_str()),
        ],
    );
    tracing::info!(%product_id, %variant_id, removed, "Wishlist remove");

    Ok(Json(RemoveResponse { ok: true, removed }))
}
