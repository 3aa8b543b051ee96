//! Feedback service.

use std::sync::Arc;

use chrono::Utc;
use helpcenter_common::validation::{trimmed, validate_email, validate_not_blank};
use helpcenter_common::{AppError, AppResult, IdGenerator};
use helpcenter_db::entities::feedback;
use helpcenter_db::repositories::FeedbackRepository;
use helpcenter_db::uow;
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::views::FeedbackView;

/// A reader's feedback submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitFeedbackInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
    pub message: String,
    #[serde(default)]
    pub expect_reply: bool,
}

/// Service for feedback messages.
#[derive(Clone)]
pub struct FeedbackService {
    db: Arc<DatabaseConnection>,
    feedback_repo: FeedbackRepository,
    id_gen: IdGenerator,
}

impl FeedbackService {
    /// Create a new feedback service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            feedback_repo: FeedbackRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Store a submission. The e-mail address is trimmed and lowercased.
    pub async fn submit(&self, input: SubmitFeedbackInput) -> AppResult<FeedbackView> {
        let input = SubmitFeedbackInput {
            email: input.email.trim().to_lowercase(),
            ..input
        };
        input.validate()?;

        let model = feedback::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(trimmed(input.name)),
            email: Set(input.email),
            message: Set(trimmed(input.message)),
            expect_reply: Set(input.expect_reply),
            created_at: Set(Utc::now().into()),
        };

        let txn = uow::begin(&self.db).await?;
        let result = self.feedback_repo.create(&txn, model).await;
        let stored = uow::finish(txn, result).await?;

        tracing::info!(feedback_id = %stored.id, expect_reply = stored.expect_reply, "Feedback received");
        Ok(stored.into())
    }

    /// Get a feedback message by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<FeedbackView> {
        self.feedback_repo
            .find_by_id(self.db.as_ref(), id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))
    }

    /// List all feedback, newest first.
    pub async fn list(&self) -> AppResult<Vec<FeedbackView>> {
        let items = self.feedback_repo.find_all(self.db.as_ref()).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Delete a feedback message.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = async {
            if self.feedback_repo.delete(&txn, id).await? {
                Ok(())
            } else {
                Err(AppError::NotFound("Feedback not found".to_string()))
            }
        }
        .await;
        uow::finish(txn, result).await?;

        tracing::info!(feedback_id = %id, "Feedback deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn submission(email: &str, message: &str) -> SubmitFeedbackInput {
        SubmitFeedbackInput {
            name: "Ada".to_string(),
            email: email.to_string(),
            message: message.to_string(),
            expect_reply: true,
        }
    }

    #[tokio::test]
    async fn test_submit_lowercases_email() {
        let stored = feedback::Model {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Great docs".to_string(),
            expect_reply: true,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let service = FeedbackService::new(db.clone());
        let view = service
            .submit(submission(" Ada@Example.COM ", "Great docs"))
            .await
            .unwrap();
        assert_eq!(view.email, "ada@example.com");
        drop(service);

        let log = format!("{:?}", Arc::into_inner(db).unwrap().into_transaction_log());
        assert!(log.contains("ada@example.com"));
        assert!(!log.contains("Ada@Example.COM"));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_email_and_long_message() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = FeedbackService::new(db);

        let err = service
            .submit(submission("not-an-email", &"x".repeat(5001)))
            .await
            .unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "message"]);
        assert_eq!(errors[0].code, "email");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = FeedbackService::new(db);
        let err = service.delete(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
