//! Read-model composition.
//!
//! Categories, guides and media reference each other, so there is no single
//! "full" shape to serialize. Each public method here renders one traversal
//! path with a fixed depth:
//!
//! | method            | nesting                                              |
//! |-------------------|------------------------------------------------------|
//! | `categories`      | category -> guides (shallow)                         |
//! | `category`        | category -> guides -> media (shallow); no categories |
//! | `guides`, `guide` | guide -> categories (shallow), media (shallow)       |
//! | `media`           | media -> guides (shallow)                            |
//!
//! Link rows are fetched once per edge kind for the whole result set.

use std::collections::HashMap;
use std::sync::Arc;

use helpcenter_common::AppResult;
use helpcenter_db::entities::{category, media, user_guide};
use helpcenter_db::repositories::{
    AssociationRepository, CategoryRepository, GuideRepository, MediaRepository,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::views::{CategoryNode, CategoryView, GuideNode, MediaNode, MediaView};

/// Builds nested read models for the public query surface.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    category_repo: CategoryRepository,
    guide_repo: GuideRepository,
    media_repo: MediaRepository,
    links: AssociationRepository,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            category_repo: CategoryRepository::new(),
            guide_repo: GuideRepository::new(),
            media_repo: MediaRepository::new(),
            links: AssociationRepository::new(),
        }
    }

    /// All categories, each with its guides rendered shallow.
    pub async fn categories(&self) -> AppResult<Vec<CategoryNode>> {
        let conn = self.db.as_ref();
        let categories = self.category_repo.find_all(conn).await?;
        let category_ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();

        let links = self.links.guide_links_for_categories(conn, &category_ids).await?;
        let guide_ids: Vec<Uuid> = links.iter().map(|l| l.guide_id).collect();
        let guides = by_id(
            self.guide_repo.find_by_ids(conn, &dedup(guide_ids)).await?,
            |g| g.id,
        );

        let mut per_category: HashMap<Uuid, Vec<&user_guide::Model>> = HashMap::new();
        for link in &links {
            if let Some(guide) = guides.get(&link.guide_id) {
                per_category.entry(link.category_id).or_default().push(guide);
            }
        }

        Ok(categories
            .into_iter()
            .map(|c| {
                let mut nested = per_category.remove(&c.id).unwrap_or_default();
                nested.sort_by_key(|g| (g.created_at, g.id));
                CategoryNode {
                    guides: nested.into_iter().cloned().map(GuideNode::shallow).collect(),
                    category: CategoryView::from(c),
                }
            })
            .collect())
    }

    /// One category with its guides and their media. The guides' own
    /// categories are left empty.
    pub async fn category(&self, slug: &str) -> AppResult<Option<CategoryNode>> {
        let conn = self.db.as_ref();
        let Some(category) = self.category_repo.find_by_slug(conn, slug).await? else {
            return Ok(None);
        };

        let guides = self.guide_repo.find_by_category(conn, category.id).await?;
        let guide_ids: Vec<Uuid> = guides.iter().map(|g| g.id).collect();
        let mut media = self.media_for(&guide_ids).await?;

        let guides = guides
            .into_iter()
            .map(|g| {
                let nested = media.remove(&g.id).unwrap_or_default();
                GuideNode {
                    media: nested,
                    ..GuideNode::shallow(g)
                }
            })
            .collect();

        Ok(Some(CategoryNode {
            category: CategoryView::from(category),
            guides,
        }))
    }

    /// Guides with shallow categories and media, optionally filtered by
    /// category slug. An unknown slug yields an empty list.
    pub async fn guides(&self, category_slug: Option<&str>) -> AppResult<Vec<GuideNode>> {
        let conn = self.db.as_ref();
        let guides = match category_slug {
            Some(slug) => match self.category_repo.find_by_slug(conn, slug).await? {
                Some(category) => self.guide_repo.find_by_category(conn, category.id).await?,
                None => return Ok(Vec::new()),
            },
            None => self.guide_repo.find_all(conn).await?,
        };
        self.guide_nodes(guides).await
    }

    /// One guide with shallow categories and media.
    pub async fn guide(&self, slug: &str) -> AppResult<Option<GuideNode>> {
        let conn = self.db.as_ref();
        match self.guide_repo.find_by_slug(conn, slug).await? {
            Some(guide) => Ok(self.guide_nodes(vec![guide]).await?.pop()),
            None => Ok(None),
        }
    }

    /// All media, each with its guides rendered shallow.
    pub async fn media(&self) -> AppResult<Vec<MediaNode>> {
        let conn = self.db.as_ref();
        let items = self.media_repo.find_all(conn).await?;
        let media_ids: Vec<Uuid> = items.iter().map(|m| m.id).collect();

        let links = self.links.guide_links_for_media(conn, &media_ids).await?;
        let guide_ids: Vec<Uuid> = links.iter().map(|l| l.guide_id).collect();
        let guides = by_id(
            self.guide_repo.find_by_ids(conn, &dedup(guide_ids)).await?,
            |g| g.id,
        );

        let mut per_media: HashMap<Uuid, Vec<&user_guide::Model>> = HashMap::new();
        for link in &links {
            if let Some(guide) = guides.get(&link.guide_id) {
                per_media.entry(link.media_id).or_default().push(guide);
            }
        }

        Ok(items
            .into_iter()
            .map(|m| {
                let mut nested = per_media.remove(&m.id).unwrap_or_default();
                nested.sort_by_key(|g| (g.created_at, g.id));
                MediaNode {
                    guides: nested.into_iter().cloned().map(GuideNode::shallow).collect(),
                    media: MediaView::from(m),
                }
            })
            .collect())
    }

    async fn guide_nodes(&self, guides: Vec<user_guide::Model>) -> AppResult<Vec<GuideNode>> {
        let conn = self.db.as_ref();
        let guide_ids: Vec<Uuid> = guides.iter().map(|g| g.id).collect();

        let links = self.links.category_links_for_guides(conn, &guide_ids).await?;
        let category_ids: Vec<Uuid> = links.iter().map(|l| l.category_id).collect();
        let categories = by_id(
            self.category_repo.find_by_ids(conn, &dedup(category_ids)).await?,
            |c| c.id,
        );
        let mut per_guide: HashMap<Uuid, Vec<&category::Model>> = HashMap::new();
        for link in &links {
            if let Some(category) = categories.get(&link.category_id) {
                per_guide.entry(link.guide_id).or_default().push(category);
            }
        }

        let mut media = self.media_for(&guide_ids).await?;

        Ok(guides
            .into_iter()
            .map(|g| {
                let mut nested = per_guide.remove(&g.id).unwrap_or_default();
                nested.sort_by_key(|c| (c.created_at, c.id));
                let categories = nested
                    .into_iter()
                    .cloned()
                    .map(|c| CategoryNode::shallow(c.into()))
                    .collect();
                let media = media.remove(&g.id).unwrap_or_default();
                GuideNode {
                    categories,
                    media,
                    ..GuideNode::shallow(g)
                }
            })
            .collect())
    }

    /// Shallow media nodes per guide id.
    async fn media_for(&self, guide_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<MediaNode>>> {
        let conn = self.db.as_ref();
        let links = self.links.media_links_for_guides(conn, guide_ids).await?;
        let media_ids: Vec<Uuid> = links.iter().map(|l| l.media_id).collect();
        let items = by_id(
            self.media_repo.find_by_ids(conn, &dedup(media_ids)).await?,
            |m| m.id,
        );

        let mut per_guide: HashMap<Uuid, Vec<&media::Model>> = HashMap::new();
        for link in &links {
            if let Some(item) = items.get(&link.media_id) {
                per_guide.entry(link.guide_id).or_default().push(item);
            }
        }

        Ok(per_guide
            .into_iter()
            .map(|(guide_id, mut nested)| {
                nested.sort_by_key(|m| (m.created_at, m.id));
                let nodes = nested
                    .into_iter()
                    .cloned()
                    .map(|m| MediaNode::shallow(m.into()))
                    .collect();
                (guide_id, nodes)
            })
            .collect())
    }
}

fn by_id<T>(rows: Vec<T>, id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, T> {
    rows.into_iter().map(|row| (id(&row), row)).collect()
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
