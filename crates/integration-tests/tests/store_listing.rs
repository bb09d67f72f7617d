//! Integration tests for the extended product listing.

use axum::http::StatusCode;
use serde_json::json;

use extended_products_admin::store::ProductStore;
use extended_products_core::{ProductId, ProductUpdate};
use extended_products_integration_tests::TestContext;

#[tokio::test]
async fn test_list_decorates_every_product() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/store/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 20);

    let pistachio = &body["products"][0];
    assert_eq!(pistachio["id"], "prod_pistachio");
    assert_eq!(pistachio["videos"], json!(["https://youtu.be/a", "https://youtu.be/b"]));
    assert_eq!(pistachio["visits"], 12);
    assert_eq!(pistachio["state"], "available");
    assert_eq!(pistachio["properties"].as_array().map(Vec::len), Some(13));

    let walnut = &body["products"][1];
    assert_eq!(walnut["state"], "unavailable");
    assert_eq!(walnut["videos"], json!([]));
    assert_eq!(walnut["visits"], 0);
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/store/products?q=WALNUT&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["products"][0]["id"], "prod_walnut");

    let (_, body) = ctx.get("/store/products?offset=1&limit=1").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["products"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["products"][0]["id"], "prod_walnut");
}

#[tokio::test]
async fn test_show_single_product() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/store/products/prod_pistachio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Roasted pistachio");
    assert_eq!(body["properties"][8]["value"], "USA");

    let (status, _) = ctx.get("/store/products/prod_missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_cached_until_form_submit() {
    let ctx = TestContext::new();
    let id = ProductId::parse("prod_walnut").expect("valid id");

    let (_, before) = ctx.get("/store/products").await;
    assert_eq!(before["products"][1]["visits"], 0);

    // A write that bypasses the form does not touch the cache
    ctx.store
        .update(
            &id,
            ProductUpdate {
                description: None,
                metadata: json!({"visitsCount": 3}).as_object().cloned(),
            },
        )
        .await
        .expect("update succeeds");
    let (_, cached) = ctx.get("/store/products").await;
    assert_eq!(cached, before);

    // A form submit invalidates it
    let (_, loaded) = ctx.get("/admin/products/prod_walnut/extended").await;
    let mut values = loaded["values"].clone();
    values["visit_count"] = json!(4);
    let (status, _) = ctx
        .post_json("/admin/products/prod_walnut/extended", &values)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fresh) = ctx.get("/store/products").await;
    assert_eq!(fresh["products"][1]["visits"], 4);
}

#[tokio::test]
async fn test_malformed_stored_metadata_degrades_to_defaults() {
    let ctx = TestContext::new();
    let id = ProductId::parse("prod_walnut").expect("valid id");
    ctx.store
        .update(
            &id,
            ProductUpdate {
                description: None,
                metadata: json!({
                    "propertiesObj": "{not json",
                    "videoUrls": 42,
                    "visitsCount": "lots",
                })
                .as_object()
                .cloned(),
            },
        )
        .await
        .expect("update succeeds");

    let (status, body) = ctx.get("/store/products/prod_walnut").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"], json!([]));
    assert_eq!(body["visits"], 0);
    assert_eq!(body["properties"][0], json!({"key": "contents", "value": ""}));
}
