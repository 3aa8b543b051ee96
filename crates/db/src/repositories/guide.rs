//! User guide repository.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, sea_query::JoinType,
};
use uuid::Uuid;

use super::{AssociationRepository, base};
use crate::entities::{UserGuide, guide_category_link, guide_media_link, user_guide};

/// Repository for user guide operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuideRepository {
    links: AssociationRepository,
}

impl GuideRepository {
    /// Create a new guide repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            links: AssociationRepository::new(),
        }
    }

    /// Find guide by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> AppResult<Option<user_guide::Model>> {
        base::find_by_id::<UserGuide, _>(conn, id).await
    }

    /// Find guide by slug.
    pub async fn find_by_slug<C: ConnectionTrait>(
        &self,
        conn: &C,
        slug: &str,
    ) -> AppResult<Option<user_guide::Model>> {
        base::find_one_by::<UserGuide, _, _>(conn, user_guide::Column::Slug, slug).await
    }

    /// List all guides, oldest first.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<user_guide::Model>> {
        base::find_all::<UserGuide, _>(conn, user_guide::Column::CreatedAt).await
    }

    /// Find the guides with the given ids. Missing ids are skipped.
    pub async fn find_by_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> AppResult<Vec<user_guide::Model>> {
        base::find_by_ids::<UserGuide, _>(conn, user_guide::Column::Id, ids).await
    }

    /// Guides associated with a category, oldest first.
    pub async fn find_by_category<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: Uuid,
    ) -> AppResult<Vec<user_guide::Model>> {
        UserGuide::find()
            .join(JoinType::InnerJoin, user_guide::Relation::GuideCategoryLink.def())
            .filter(guide_category_link::Column::CategoryId.eq(category_id))
            .order_by(user_guide::Column::CreatedAt, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Guides a media item is attached to, oldest first.
    pub async fn find_by_media<C: ConnectionTrait>(
        &self,
        conn: &C,
        media_id: Uuid,
    ) -> AppResult<Vec<user_guide::Model>> {
        UserGuide::find()
            .join(JoinType::InnerJoin, user_guide::Relation::GuideMediaLink.def())
            .filter(guide_media_link::Column::MediaId.eq(media_id))
            .order_by(user_guide::Column::CreatedAt, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Whether another guide already uses `slug`.
    pub async fn slug_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        slug: &str,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        let mut query = UserGuide::find().filter(user_guide::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(user_guide::Column::Id.ne(id));
        }
        let count = query.count(conn).await.map_err(db_err)?;
        Ok(count > 0)
    }

    /// Insert a guide.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user_guide::ActiveModel,
    ) -> AppResult<user_guide::Model> {
        base::insert(conn, model).await
    }

    /// Apply a partial update.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user_guide::ActiveModel,
    ) -> AppResult<user_guide::Model> {
        base::update(conn, model).await
    }

    /// Delete a guide together with its category and media associations.
    ///
    /// Returns whether the guide existed.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<bool> {
        self.links.remove_guide_category_links(conn, id).await?;
        self.links.remove_guide_media_links(conn, id).await?;
        base::delete_by_id::<UserGuide, _>(conn, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_guide(slug: &str) -> user_guide::Model {
        user_guide::Model {
            id: Uuid::new_v4(),
            title: "Welcome".to_string(),
            slug: slug.to_string(),
            body: json!({"blocks": [{"type": "paragraph", "text": "Hi"}]}),
            estimated_read_time: 3,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_category() {
        let g1 = create_test_guide("a");
        let g2 = create_test_guide("b");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[g1, g2]])
            .into_connection();

        let repo = GuideRepository::new();
        let result = repo.find_by_category(&db, Uuid::new_v4()).await.unwrap();

        assert_eq!(result.len(), 2);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INNER JOIN"));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let repo = GuideRepository::new();
        assert!(repo.find_by_ids(&db, &[]).await.unwrap().is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_both_link_tables() {
        let exec = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(2), exec(1), exec(1)])
            .into_connection();

        let repo = GuideRepository::new();
        assert!(repo.delete(&db, Uuid::new_v4()).await.unwrap());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 3);
        assert!(format!("{:?}", log[0]).contains("guide_category_link"));
        assert!(format!("{:?}", log[1]).contains("guide_media_link"));
    }
}
