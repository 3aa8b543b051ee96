//! GraphQL object types.
//!
//! Each type is a straight copy of a catalog node. How deep the nested lists
//! go is decided when the node is built, not here.

#![allow(missing_docs)]

use async_graphql::{Json, SimpleObject};
use chrono::{DateTime, Utc};
use helpcenter_core::{CategoryNode, FeedbackView, GuideNode, MediaNode, MediaView};
use serde_json::Value;

/// A group of guides.
#[derive(Debug, Clone, SimpleObject)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub guides: Vec<UserGuide>,
}

impl From<CategoryNode> for Category {
    fn from(node: CategoryNode) -> Self {
        let c = node.category;
        Self {
            id: c.id.to_string(),
            name: c.name,
            description: c.description,
            slug: c.slug,
            created_at: c.created_at,
            updated_at: c.updated_at,
            guides: node.guides.into_iter().map(Into::into).collect(),
        }
    }
}

/// A help article.
#[derive(Debug, Clone, SimpleObject)]
pub struct UserGuide {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub estimated_read_time: i32,
    /// Block document, `{"blocks": [...]}`.
    pub body: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<Category>,
    pub media: Vec<Media>,
}

impl From<GuideNode> for UserGuide {
    fn from(node: GuideNode) -> Self {
        Self {
            id: node.id.to_string(),
            title: node.title,
            slug: node.slug,
            estimated_read_time: node.estimated_read_time,
            body: Json(node.body),
            created_at: node.created_at,
            updated_at: node.updated_at,
            categories: node.categories.into_iter().map(Into::into).collect(),
            media: node.media.into_iter().map(Into::into).collect(),
        }
    }
}

/// An image or video.
#[derive(Debug, Clone, SimpleObject)]
pub struct Media {
    pub id: String,
    pub alt: Option<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub guides: Vec<UserGuide>,
}

impl From<MediaView> for Media {
    fn from(m: MediaView) -> Self {
        Self {
            id: m.id.to_string(),
            alt: m.alt,
            url: m.url,
            created_at: m.created_at,
            updated_at: m.updated_at,
            guides: Vec::new(),
        }
    }
}

impl From<MediaNode> for Media {
    fn from(node: MediaNode) -> Self {
        Self {
            guides: node.guides.into_iter().map(Into::into).collect(),
            ..node.media.into()
        }
    }
}

/// A stored feedback message.
#[derive(Debug, Clone, SimpleObject)]
pub struct Feedback {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub expect_reply: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackView> for Feedback {
    fn from(f: FeedbackView) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name,
            email: f.email,
            message: f.message,
            expect_reply: f.expect_reply,
            created_at: f.created_at,
        }
    }
}
