//! Read-only transfer representations.
//!
//! Flat views mirror one row each; services hand these out instead of live
//! entity models. The `*Node` types are the composed, nested shapes built by
//! [`CatalogService`](crate::CatalogService). A node's nested lists are only
//! as deep as the traversal path that built it, so they never cycle.

#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use helpcenter_db::entities::{category, feedback, media, user_guide};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A category without relations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<category::Model> for CategoryView {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            slug: m.slug,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// A guide with the ids of its associations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: Value,
    pub estimated_read_time: i32,
    pub category_ids: Vec<Uuid>,
    pub media_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GuideView {
    /// Build from a row and its association ids.
    #[must_use]
    pub fn new(m: user_guide::Model, category_ids: Vec<Uuid>, media_ids: Vec<Uuid>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            body: m.body,
            estimated_read_time: m.estimated_read_time,
            category_ids,
            media_ids,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// A media item without relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaView {
    pub id: Uuid,
    pub url: String,
    pub alt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<media::Model> for MediaView {
    fn from(m: media::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            alt: m.alt,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// A feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub expect_reply: bool,
    pub created_at: DateTime<Utc>,
}

impl From<feedback::Model> for FeedbackView {
    fn from(m: feedback::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            expect_reply: m.expect_reply,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// Category with nested guides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: CategoryView,
    pub guides: Vec<GuideNode>,
}

impl CategoryNode {
    /// Node with no guides.
    #[must_use]
    pub const fn shallow(category: CategoryView) -> Self {
        Self {
            category,
            guides: Vec::new(),
        }
    }
}

/// Guide with nested categories and media.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideNode {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: Value,
    pub estimated_read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryNode>,
    pub media: Vec<MediaNode>,
}

impl GuideNode {
    /// Node with no categories and no media.
    #[must_use]
    pub fn shallow(m: user_guide::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            body: m.body,
            estimated_read_time: m.estimated_read_time,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
            categories: Vec::new(),
            media: Vec::new(),
        }
    }
}

/// Media with nested guides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaNode {
    #[serde(flatten)]
    pub media: MediaView,
    pub guides: Vec<GuideNode>,
}

impl MediaNode {
    /// Node with no guides.
    #[must_use]
    pub const fn shallow(media: MediaView) -> Self {
        Self {
            media,
            guides: Vec::new(),
        }
    }
}
