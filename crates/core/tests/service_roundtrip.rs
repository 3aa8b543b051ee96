//! Service round-trip tests against a real database.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p helpcenter-core --test service_roundtrip -- --ignored --test-threads=1`
//!
//! Connection settings come from the same `TEST_DB_*` variables as the
//! database crate's integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use helpcenter_common::PlaceholderStorage;
use helpcenter_core::{
    CategoryService, CreateCategoryInput, CreateGuideInput, CreateMediaInput, GuideService,
    MediaService,
};
use helpcenter_db::test_utils::TestDatabase;
use serde_json::json;

async fn setup() -> TestDatabase {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    db
}

fn category_input(slug: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: format!("Category {slug}"),
        description: Some("Everything about it".to_string()),
        slug: slug.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_category_reads_match_create() {
    let db = setup().await;
    let service = CategoryService::new(Arc::new(db.conn));

    let created = service.create(category_input("billing")).await.unwrap();

    assert_eq!(service.get(created.id).await.unwrap(), created);
    assert_eq!(service.get_by_slug("billing").await.unwrap(), created);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_guide_reads_match_create() {
    let db = setup().await;
    let conn = Arc::new(db.conn);
    let categories = CategoryService::new(Arc::clone(&conn));
    let media = MediaService::new(Arc::clone(&conn), Arc::new(PlaceholderStorage));
    let guides = GuideService::new(conn);

    let mut category_ids = Vec::new();
    for slug in ["accounts", "billing", "security"] {
        category_ids.push(categories.create(category_input(slug)).await.unwrap().id);
    }
    let mut media_ids = Vec::new();
    for n in 0..2 {
        let item = media
            .create(CreateMediaInput {
                url: format!("https://cdn.example.com/shot-{n}.png"),
                alt: None,
                guide_ids: Vec::new(),
            })
            .await
            .unwrap();
        media_ids.push(item.id);
    }
    category_ids.reverse();
    media_ids.reverse();

    let body = json!({"version": 2, "blocks": [
        {"type": "heading", "level": 1, "text": "Reset your password", "id": "h-1"},
        {"type": "paragraph", "text": "Open the account page."},
        {"type": "list", "items": ["Click reset", "Check your inbox"], "style": "ordered"},
        {"type": "heading", "level": 2, "text": "Still stuck?"},
        {"type": "paragraph", "text": "Contact support."}
    ]});

    let created = guides
        .create(CreateGuideInput {
            title: "Reset your password".to_string(),
            slug: "reset-password".to_string(),
            body: body.clone(),
            estimated_read_time: 4,
            category_ids,
            media_ids,
        })
        .await
        .unwrap();

    assert_eq!(created.body, body);
    assert_eq!(created.category_ids.len(), 3);
    assert_eq!(created.media_ids.len(), 2);

    let by_id = guides.get(created.id).await.unwrap();
    assert_eq!(by_id, created);
    let by_slug = guides.get_by_slug("reset-password").await.unwrap();
    assert_eq!(by_slug, created);

    let listed = guides.list(Some("billing")).await.unwrap();
    assert_eq!(listed, vec![created]);
}
