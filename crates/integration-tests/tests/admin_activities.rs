//! End-to-end tests for activity management.
//!
//! Each test creates its own activity and deletes it afterwards.
//! Run with: `cargo test -p hactor-integration-tests -- --ignored`

use hactor_core::ActivityDate;
use hactor_integration_tests::{TestContext, json_body};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

async fn create_activity(ctx: &TestContext, title: &str, date: &str) -> Value {
    let resp = ctx
        .client
        .post(ctx.url("/api/admin/activities"))
        .json(&json!({
            "title": title,
            "category": "Study",
            "date": date,
            "content": "  e2e  ",
            "imageUrls": ["https://cdn.example/a.png", " https://cdn.example/a.png "],
        }))
        .send()
        .await
        .expect("Failed to create activity");

    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["activity"].clone()
}

async fn delete_activity(ctx: &TestContext, id: &str) -> StatusCode {
    ctx.client
        .delete(ctx.url(&format!("/api/admin/activities/{id}")))
        .send()
        .await
        .expect("Failed to delete activity")
        .status()
}

#[tokio::test]
#[ignore = "Requires running server and provisioned admin"]
async fn test_activity_lifecycle() {
    let ctx = TestContext::authenticated().await;
    let title = format!("e2e {}", Uuid::new_v4());

    let activity = create_activity(&ctx, &title, "2024-03-15").await;
    let id = activity["id"].as_str().expect("id").to_string();
    assert_eq!(activity["title"], title.as_str());
    assert_eq!(activity["year"], 2024);
    assert_eq!(activity["content"], "e2e");
    assert_eq!(activity["imageUrls"], json!(["https://cdn.example/a.png"]));

    let resp = ctx
        .client
        .patch(ctx.url(&format!("/api/admin/activities/{id}")))
        .json(&json!({ "date": "2025-11-02", "content": null }))
        .send()
        .await
        .expect("Failed to update activity");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await["activity"].clone();

    let expected = ActivityDate::parse("2025-11-02").expect("valid date");
    assert_eq!(updated["year"], expected.year());
    assert_eq!(updated["dateLabel"], expected.label());
    assert!(updated["content"].is_null());

    assert_eq!(delete_activity(&ctx, &id).await, StatusCode::OK);
    assert_eq!(delete_activity(&ctx, &id).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and provisioned admin"]
async fn test_public_feed_lists_created_activity() {
    let ctx = TestContext::authenticated().await;
    let title = format!("e2e feed {}", Uuid::new_v4());
    let activity = create_activity(&ctx, &title, "2024-01-01").await;
    let id = activity["id"].as_str().expect("id").to_string();

    let anonymous = TestContext::new();
    let resp = anonymous
        .client
        .get(anonymous.url("/api/activities"))
        .send()
        .await
        .expect("Failed to fetch feed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let listed = body["activities"]
        .as_array()
        .expect("activities array")
        .iter()
        .any(|entry| entry["id"] == id.as_str());
    assert!(listed);

    assert_eq!(delete_activity(&ctx, &id).await, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and provisioned admin"]
async fn test_invalid_activity_is_rejected() {
    let ctx = TestContext::authenticated().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/admin/activities"))
        .json(&json!({ "title": "x", "category": "y", "date": "2024-02-30" }))
        .send()
        .await
        .expect("Failed to send create");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["ok"], false);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_activity_writes_require_session() {
    let ctx = TestContext::new();
    let resp = ctx
        .client
        .post(ctx.url("/api/admin/activities"))
        .json(&json!({ "title": "x", "category": "y", "date": "2024-02-01" }))
        .send()
        .await
        .expect("Failed to send create");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
