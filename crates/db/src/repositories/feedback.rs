//! Feedback repository.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{ConnectionTrait, EntityTrait, Order, QueryOrder};
use uuid::Uuid;

use super::base;
use crate::entities::{Feedback, feedback};

/// Repository for feedback operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackRepository;

impl FeedbackRepository {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find feedback by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> AppResult<Option<feedback::Model>> {
        base::find_by_id::<Feedback, _>(conn, id).await
    }

    /// List all feedback, newest first.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<feedback::Model>> {
        Feedback::find()
            .order_by(feedback::Column::CreatedAt, Order::Desc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Insert a feedback row.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: feedback::ActiveModel,
    ) -> AppResult<feedback::Model> {
        base::insert(conn, model).await
    }

    /// Delete feedback. Returns whether the row existed.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<bool> {
        base::delete_by_id::<Feedback, _>(conn, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_all() {
        let item = feedback::Model {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Great docs".to_string(),
            expect_reply: false,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[item.clone()]])
            .into_connection();

        let repo = FeedbackRepository::new();
        let result = repo.find_all(&db).await.unwrap();

        assert_eq!(result, vec![item]);
    }
}
