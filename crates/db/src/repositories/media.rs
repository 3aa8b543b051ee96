//! Media repository.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, sea_query::JoinType,
};
use uuid::Uuid;

use super::{AssociationRepository, base};
use crate::entities::{Media, guide_media_link, media};

/// Repository for media operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaRepository {
    links: AssociationRepository,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            links: AssociationRepository::new(),
        }
    }

    /// Find media by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> AppResult<Option<media::Model>> {
        base::find_by_id::<Media, _>(conn, id).await
    }

    /// List all media, oldest first.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<media::Model>> {
        base::find_all::<Media, _>(conn, media::Column::CreatedAt).await
    }

    /// Find the media with the given ids. Missing ids are skipped.
    pub async fn find_by_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> AppResult<Vec<media::Model>> {
        base::find_by_ids::<Media, _>(conn, media::Column::Id, ids).await
    }

    /// Media attached to a guide, oldest first.
    pub async fn find_by_guide<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
    ) -> AppResult<Vec<media::Model>> {
        Media::find()
            .join(JoinType::InnerJoin, media::Relation::GuideMediaLink.def())
            .filter(guide_media_link::Column::GuideId.eq(guide_id))
            .order_by(media::Column::CreatedAt, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Insert a media row.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: media::ActiveModel,
    ) -> AppResult<media::Model> {
        base::insert(conn, model).await
    }

    /// Apply a partial update.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: media::ActiveModel,
    ) -> AppResult<media::Model> {
        base::update(conn, model).await
    }

    /// Delete a media row and its guide associations.
    ///
    /// Returns whether the media row existed.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<bool> {
        self.links.remove_media_links(conn, id).await?;
        base::delete_by_id::<Media, _>(conn, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_media() -> media::Model {
        media::Model {
            id: Uuid::new_v4(),
            url: "https://cdn.example.com/a.png".to_string(),
            alt: Some("diagram".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_guide() {
        let media = create_test_media();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[media.clone()]])
            .into_connection();

        let repo = MediaRepository::new();
        let result = repo.find_by_guide(&db, Uuid::new_v4()).await.unwrap();

        assert_eq!(result, vec![media]);
    }

    #[tokio::test]
    async fn test_delete_removes_links_first() {
        let exec = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(4), exec(1)])
            .into_connection();

        let repo = MediaRepository::new();
        assert!(repo.delete(&db, Uuid::new_v4()).await.unwrap());

        let log = db.into_transaction_log();
        assert!(format!("{:?}", log[0]).contains("guide_media_link"));
    }
}
