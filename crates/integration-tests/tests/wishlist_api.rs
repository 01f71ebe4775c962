//! Integration tests for the wishlist routes.
//!
//! Every request goes through the full router: request id middleware,
//! App Proxy verification, handlers and an in-memory `SQLite` store.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use wishlist_proxy_integration_tests::{TestContext, TestResponse, customer_query, request};

const SHOP: &str = "a.myshopify.com";

// =============================================================================
// End to End
// =============================================================================

#[tokio::test]
async fn test_add_list_remove_flow() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    let body = json!({ "product_id": "123", "variant_id": "", "title": "Hat" });
    let res = ctx
        .send(request(Method::POST, "/wishlist", &query, Some(&body)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.is_json());
    assert_eq!(res.json(), json!({ "ok": true, "inserted": true }));

    let res = ctx
        .send(request(Method::POST, "/wishlist", &query, Some(&body)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "ok": true, "inserted": false }));

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.status, StatusCode::OK);
    let list = res.json();
    assert_eq!(list["ok"], true);
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], "123");
    assert_eq!(items[0]["variant_id"], "");
    assert_eq!(items[0]["title"], "Hat");
    assert_eq!(items[0]["handle"], "");
    assert_eq!(items[0]["image"], "");
    assert!(items[0]["created_at"].is_string());

    let delete_query = customer_query(SHOP, "7", &[("product_id", "123"), ("variant_id", "")]);
    let res = ctx
        .send(request(Method::DELETE, "/wishlist", &delete_query, None))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "ok": true, "removed": true }));

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.json(), json!({ "ok": true, "items": [] }));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    for product_id in ["1", "2", "3"] {
        let body = json!({ "product_id": product_id });
        let res = ctx
            .send(request(Method::POST, "/wishlist", &query, Some(&body)))
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    let ids: Vec<String> = res.json()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["product_id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ids, ["3", "2", "1"]);
}

#[tokio::test]
async fn test_variants_are_distinct_entries() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    for body in [
        json!({ "product_id": "123" }),
        json!({ "product_id": "123", "variant_id": "456" }),
        json!({ "product_id": 123, "variant_id": 456 }),
    ] {
        ctx.send(request(Method::POST, "/wishlist", &query, Some(&body)))
            .await;
    }

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.json()["items"].as_array().unwrap().len(), 2);

    // Removing without a variant only removes the variant-less entry.
    let delete_query = customer_query(SHOP, "7", &[("product_id", "123")]);
    let res = ctx
        .send(request(Method::DELETE, "/wishlist", &delete_query, None))
        .await;
    assert_eq!(res.json()["removed"], true);

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    let items = res.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["variant_id"], "456");
}

#[tokio::test]
async fn test_remove_missing_item_is_not_an_error() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[("product_id", "999")]);

    let res = ctx
        .send(request(Method::DELETE, "/wishlist", &query, None))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "ok": true, "removed": false }));
}

// =============================================================================
// Scoping
// =============================================================================

#[tokio::test]
async fn test_customers_and_shops_are_isolated() {
    let ctx = TestContext::new().await;
    let body = json!({ "product_id": "123" });

    ctx.send(request(
        Method::POST,
        "/wishlist",
        &customer_query(SHOP, "7", &[]),
        Some(&body),
    ))
    .await;

    for (shop, customer) in [(SHOP, "8"), ("b.myshopify.com", "7")] {
        let res = ctx
            .send(request(
                Method::GET,
                "/wishlist",
                &customer_query(shop, customer, &[]),
                None,
            ))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["items"], json!([]), "{shop} / {customer}");
    }

    // Another customer cannot remove the entry either.
    let res = ctx
        .send(request(
            Method::DELETE,
            "/wishlist",
            &customer_query(SHOP, "8", &[("product_id", "123")]),
            None,
        ))
        .await;
    assert_eq!(res.json()["removed"], false);

    let res = ctx
        .send(request(
            Method::GET,
            "/wishlist",
            &customer_query(SHOP, "7", &[]),
            None,
        ))
        .await;
    assert_eq!(res.json()["items"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_add_requires_product_id() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    for body in [json!({}), json!({ "product_id": "" }), json!({ "product_id": "   " })] {
        let res = ctx
            .send(request(Method::POST, "/wishlist", &query, Some(&body)))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
        let error = res.json();
        assert_eq!(error["ok"], false);
        assert!(error["error"].is_string());
    }

    let res = ctx.send(request(Method::POST, "/wishlist", &query, None)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.json()["items"], json!([]));
}

#[tokio::test]
async fn test_remove_requires_product_id() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[("variant_id", "456")]);

    let res = ctx
        .send(request(Method::DELETE, "/wishlist", &query, None))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["ok"], false);
}

#[tokio::test]
async fn test_add_rejects_invalid_json() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    let req = axum::http::Request::builder()
        .method(Method::POST)
        .uri(format!("/wishlist?{query}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let res = ctx.send(req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.is_json());
    assert_eq!(res.json()["ok"], false);
}

#[tokio::test]
async fn test_add_rejects_non_object_body() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);

    for body in [
        json!([1]),
        json!(["123", "", "h", "t", "i"]),
        json!("123"),
        json!(123),
    ] {
        let res = ctx
            .send(request(Method::POST, "/wishlist", &query, Some(&body)))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(res.is_json());
        assert_eq!(res.json()["ok"], false);
    }

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.json()["items"], json!([]));
}

// =============================================================================
// Storage Faults
// =============================================================================

fn assert_storage_error(res: &TestResponse) {
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.is_json());
    assert_eq!(
        res.json(),
        json!({ "ok": false, "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_closed_pool_is_internal_error() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);
    ctx.state.pool().close().await;

    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_storage_error(&res);

    let body = json!({ "product_id": "123" });
    let res = ctx
        .send(request(Method::POST, "/wishlist", &query, Some(&body)))
        .await;
    assert_storage_error(&res);
}

#[tokio::test]
async fn test_missing_table_is_internal_error() {
    let ctx = TestContext::new().await;
    sqlx::query("DROP TABLE wishlist_item")
        .execute(ctx.state.pool())
        .await
        .unwrap();

    let query = customer_query(SHOP, "7", &[("product_id", "123")]);
    let res = ctx
        .send(request(Method::DELETE, "/wishlist", &query, None))
        .await;
    assert_storage_error(&res);

    // Details of the fault stay in the logs.
    assert!(!res.body.contains("wishlist_item"));
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_proxy_subpath_mount() {
    let ctx = TestContext::new().await;
    let query = customer_query(SHOP, "7", &[]);
    let body = json!({ "product_id": "123" });

    let res = ctx
        .send(request(Method::POST, "/apps/wishlist", &query, Some(&body)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["inserted"], true);

    // Both mounts share one store.
    let res = ctx.send(request(Method::GET, "/wishlist", &query, None)).await;
    assert_eq!(res.json()["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let res = ctx.send(request(Method::GET, "/health", "", None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "ok": true }));

    let res = ctx
        .send(request(Method::GET, "/health/ready", "", None))
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_when_pool_closed() {
    let ctx = TestContext::new().await;
    ctx.state.pool().close().await;

    let res = ctx
        .send(request(Method::GET, "/health/ready", "", None))
        .await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}
