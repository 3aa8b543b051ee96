//! GraphQL schema tests against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use chrono::Utc;
use helpcenter_db::entities::{category, feedback, guide_category_link, user_guide};
use helpcenter_graphql::{HelpCenterSchema, build_schema};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use uuid::Uuid;

fn schema(db: DatabaseConnection) -> HelpCenterSchema {
    build_schema(Arc::new(db))
}

fn create_test_category(slug: &str) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        name: "Docs".to_string(),
        description: Some("Documentation".to_string()),
        slug: slug.to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_guide(slug: &str) -> user_guide::Model {
    user_guide::Model {
        id: Uuid::new_v4(),
        title: "Install".to_string(),
        slug: slug.to_string(),
        body: json!({"blocks": [{"type": "paragraph", "text": "Run it"}]}),
        estimated_read_time: 3,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_guides_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user_guide::Model>::new()])
        .into_connection();

    let response = schema(db).execute("{ guides { id title } }").await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap(), json!({"guides": []}));
}

#[tokio::test]
async fn test_unknown_category_slug_is_null() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let response = schema(db)
        .execute(r#"{ category(slug: "missing") { id } }"#)
        .await;

    assert!(response.errors.is_empty());
    assert_eq!(response.data.into_json().unwrap(), json!({"category": null}));
}

#[tokio::test]
async fn test_guide_by_slug_nests_categories() {
    let guide = create_test_guide("install");
    let docs = create_test_category("docs");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[guide.clone()]])
        .append_query_results([[guide_category_link::Model {
            guide_id: guide.id,
            category_id: docs.id,
        }]])
        .append_query_results([[docs.clone()]])
        .append_query_results([Vec::<helpcenter_db::entities::guide_media_link::Model>::new()])
        .into_connection();

    let response = schema(db)
        .execute(
            r#"{ guide(slug: "install") {
                slug estimatedReadTime body
                categories { slug guides { id } }
                media { id }
            } }"#,
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["guide"]["estimatedReadTime"], 3);
    assert_eq!(data["guide"]["body"]["blocks"][0]["type"], "paragraph");
    assert_eq!(
        data["guide"]["categories"],
        json!([{"slug": "docs", "guides": []}])
    );
    assert_eq!(data["guide"]["media"], json!([]));
}

#[tokio::test]
async fn test_submit_feedback() {
    let stored = feedback::Model {
        id: Uuid::new_v4(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        message: "Great docs".to_string(),
        expect_reply: true,
        created_at: Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .into_connection();

    let response = schema(db)
        .execute(
            r#"mutation { submitFeedback(
                name: "Ada", email: " Ada@Example.com ", message: "Great docs", expectReply: true
            ) { id email expectReply } }"#,
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["submitFeedback"]["id"], stored.id.to_string());
    assert_eq!(data["submitFeedback"]["expectReply"], true);
}

#[tokio::test]
async fn test_submit_feedback_invalid_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = schema(db)
        .execute(
            r#"mutation { submitFeedback(name: "Ada", email: "nope", message: "Hi") { id } }"#,
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(error["extensions"]["code"], "VALIDATION_ERROR");
    assert_eq!(error["extensions"]["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_database_failure_hides_detail() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sea_orm::DbErr::Custom("connection reset".to_string())])
        .into_connection();

    let response = schema(db).execute("{ media { id } }").await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "An internal error occurred");
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(error["extensions"]["code"], "DATABASE_ERROR");
}
