//! Integration tests for the admin extended product form.

use axum::http::StatusCode;
use serde_json::json;

use extended_products_admin::store::ProductStore;
use extended_products_core::{ExtendedAttributes, ProductId};
use extended_products_integration_tests::TestContext;

// ============================================================================
// Load
// ============================================================================

#[tokio::test]
async fn test_show_extended_decodes_metadata() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/admin/products/prod_pistachio/extended").await;

    assert_eq!(status, StatusCode::OK);
    let values = &body["values"];
    assert_eq!(values["description"], "Salted, in shell");
    assert_eq!(values["visit_count"], 12);
    assert_eq!(values["video_links"], json!(["https://youtu.be/a", "https://youtu.be/b"]));
    assert_eq!(values["properties"].as_array().map(Vec::len), Some(13));
    assert_eq!(values["properties"][8], json!({"key": "country", "value": "USA"}));

    // Only the primitive, non-hidden key is editable
    assert_eq!(
        values["metadata"]["entries"],
        json!([{"key": "brand", "value": "Orchard Co", "state": "existing"}])
    );
    assert_eq!(values["metadata"]["extra_metadata"]["shipping"], json!({"fragile": false}));
    assert!(body.get("notifications").is_none());
}

#[tokio::test]
async fn test_show_extended_defaults_for_bare_product() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/admin/products/prod_walnut/extended").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"]["description"], "");
    assert_eq!(body["values"]["visit_count"], 0);
    assert_eq!(body["values"]["video_links"], json!([]));
}

#[tokio::test]
async fn test_show_extended_unknown_product() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/admin/products/prod_missing/extended").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_submit_round_trips_through_store() {
    let ctx = TestContext::new();
    let (_, loaded) = ctx.get("/admin/products/prod_pistachio/extended").await;

    let mut values = loaded["values"].clone();
    values["description"] = json!("Salted, **roasted** in shell");
    values["visit_count"] = json!(13);
    values["video_links"] = json!(["https://youtu.be/c"]);
    values["properties"][2]["value"] = json!("12 months");
    values["metadata"]["entries"]
        .as_array_mut()
        .expect("entries array")
        .push(json!({"key": "origin", "value": "Iran", "state": "added"}));

    let (status, body) = ctx
        .post_json("/admin/products/prod_pistachio/extended", &values)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"]["visit_count"], 13);
    assert_eq!(body["values"]["video_links"], json!(["https://youtu.be/c"]));
    assert_eq!(body["values"]["properties"][2]["value"], "12 months");
    assert_eq!(
        body["notifications"],
        json!([{
            "level": "success",
            "title": "Success",
            "message": "Extended information for product Roasted pistachio updated"
        }])
    );

    // The stored metadata keeps the wire format
    let stored = ctx
        .store
        .get_by_id(&ProductId::parse("prod_pistachio").expect("valid id"))
        .await
        .expect("product exists");
    let metadata = stored.metadata.expect("metadata");
    assert_eq!(metadata["videoUrls"], "https://youtu.be/c");
    assert_eq!(metadata["visitsCount"], 13);
    assert_eq!(metadata["origin"], "Iran");
    assert_eq!(metadata["shipping"], json!({"fragile": false}));
    assert!(metadata["propertiesObj"].as_str().is_some_and(|s| s.contains("12 months")));
    assert_eq!(stored.description.as_deref(), Some("Salted, **roasted** in shell"));
}

#[tokio::test]
async fn test_submit_deleted_key_is_written_as_empty_string() {
    let ctx = TestContext::new();
    let (_, loaded) = ctx.get("/admin/products/prod_pistachio/extended").await;

    let mut values = loaded["values"].clone();
    values["metadata"]["entries"] = json!([]);
    values["metadata"]["deleted_keys"] = json!(["brand"]);

    let (status, body) = ctx
        .post_json("/admin/products/prod_pistachio/extended", &values)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["product"]["metadata"]["brand"],
        "",
        "deleted keys are tombstoned, not removed"
    );
}

#[tokio::test]
async fn test_submit_unknown_product() {
    let ctx = TestContext::new();

    let form = serde_json::to_value(ExtendedAttributes::default()).expect("form serializes");

    let (status, _) = ctx
        .post_json("/admin/products/prod_missing/extended", &form)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_partial_form_is_rejected() {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .post_json(
            "/admin/products/prod_pistachio/extended",
            &json!({"visit_count": 7}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let stored = ctx
        .store
        .get_by_id(&ProductId::parse("prod_pistachio").expect("valid id"))
        .await
        .expect("product exists");
    assert_eq!(stored.description.as_deref(), Some("Salted, in shell"));
    let metadata = stored.metadata.expect("metadata");
    assert_eq!(metadata["visitsCount"], 12);
    assert_eq!(metadata["videoUrls"], "https://youtu.be/a|https://youtu.be/b");
}

#[tokio::test]
async fn test_submit_rejects_malformed_body() {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .post_json(
            "/admin/products/prod_pistachio/extended",
            &json!({"visit_count": "many"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_extended_rules_inert_by_default() {
    let ctx = TestContext::new();
    let (_, loaded) = ctx.get("/admin/products/prod_pistachio/extended").await;
    let mut values = loaded["values"].clone();
    values["video_links"] = json!(["http://example.com/v"]);

    let (status, _) = ctx
        .post_json("/admin/products/prod_pistachio/extended", &values)
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_enforced_rules_reject_and_leave_store_untouched() {
    let ctx = TestContext::enforced();
    let (_, loaded) = ctx.get("/admin/products/prod_pistachio/extended").await;
    let mut values = loaded["values"].clone();
    values["video_links"] = json!(["http://example.com/v"]);

    let (status, body) = ctx
        .post_json("/admin/products/prod_pistachio/extended", &values)
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "videos[0]");

    let stored = ctx
        .store
        .get_by_id(&ProductId::parse("prod_pistachio").expect("valid id"))
        .await
        .expect("product exists");
    assert_eq!(
        stored.metadata.expect("metadata")["videoUrls"],
        "https://youtu.be/a|https://youtu.be/b"
    );
}
