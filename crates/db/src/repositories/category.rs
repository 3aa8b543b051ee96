//! Category repository.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::{AssociationRepository, base};
use crate::entities::{Category, category};

/// Repository for category operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRepository {
    links: AssociationRepository,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            links: AssociationRepository::new(),
        }
    }

    /// Find category by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> AppResult<Option<category::Model>> {
        base::find_by_id::<Category, _>(conn, id).await
    }

    /// Find category by slug.
    pub async fn find_by_slug<C: ConnectionTrait>(
        &self,
        conn: &C,
        slug: &str,
    ) -> AppResult<Option<category::Model>> {
        base::find_one_by::<Category, _, _>(conn, category::Column::Slug, slug).await
    }

    /// List all categories, oldest first.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<category::Model>> {
        base::find_all::<Category, _>(conn, category::Column::CreatedAt).await
    }

    /// Find the categories with the given ids. Missing ids are skipped.
    pub async fn find_by_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> AppResult<Vec<category::Model>> {
        base::find_by_ids::<Category, _>(conn, category::Column::Id, ids).await
    }

    /// Whether another category already uses `slug`.
    pub async fn slug_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        slug: &str,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        let mut query = Category::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(category::Column::Id.ne(id));
        }
        let count = query.count(conn).await.map_err(db_err)?;
        Ok(count > 0)
    }

    /// Insert a category.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: category::ActiveModel,
    ) -> AppResult<category::Model> {
        base::insert(conn, model).await
    }

    /// Apply a partial update.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: category::ActiveModel,
    ) -> AppResult<category::Model> {
        base::update(conn, model).await
    }

    /// Delete a category and its guide associations.
    ///
    /// Returns whether the category existed.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<bool> {
        self.links.remove_category_links(conn, id).await?;
        base::delete_by_id::<Category, _>(conn, id).await
    }
}
