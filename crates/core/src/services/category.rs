//! Category service.

use std::sync::Arc;

use chrono::Utc;
use helpcenter_common::error::SLUG_CONFLICT_MESSAGE;
use helpcenter_common::validation::{trimmed, validate_not_blank, validate_slug};
use helpcenter_common::{AppError, AppResult, IdGenerator, Patch};
use helpcenter_db::entities::category;
use helpcenter_db::repositories::CategoryRepository;
use helpcenter_db::uow;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::fields::FieldChecks;
use crate::views::CategoryView;

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 500), custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

/// Partial update of a category. Absent keys are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCategoryInput {
    pub name: Patch<String>,
    /// `null` clears the description.
    pub description: Patch<String>,
    pub slug: Patch<String>,
}

impl UpdateCategoryInput {
    fn validate(&self) -> AppResult<()> {
        let mut checks = FieldChecks::new();

        checks.not_null("name", &self.name);
        if let Some(name) = self.name.as_set() {
            checks.length("name", name, 1, 100);
            checks.check("name", validate_not_blank(name));
        }
        if let Some(description) = self.description.as_set() {
            checks.length("description", description, 0, 500);
            checks.check("description", validate_not_blank(description));
        }
        checks.not_null("slug", &self.slug);
        if let Some(slug) = self.slug.as_set() {
            checks.check("slug", validate_slug(slug));
        }

        checks.finish()
    }
}

/// Service for managing categories.
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            category_repo: CategoryRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a category.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<CategoryView> {
        input.validate()?;
        let slug = input.slug;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(trimmed(input.name)),
            description: Set(input.description.map(trimmed)),
            slug: Set(slug.clone()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let txn = uow::begin(&self.db).await?;
        let result = async {
            if self.category_repo.slug_taken(&txn, &slug, None).await? {
                return Err(AppError::Conflict(SLUG_CONFLICT_MESSAGE.to_string()));
            }
            self.category_repo.create(&txn, model).await
        }
        .await;
        let created = uow::finish(txn, result).await?;

        tracing::info!(category_id = %created.id, slug = %created.slug, "Category created");
        Ok(created.into())
    }

    /// Get a category by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<CategoryView> {
        self.category_repo
            .find_by_id(self.db.as_ref(), id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Get a category by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<CategoryView> {
        self.category_repo
            .find_by_slug(self.db.as_ref(), slug)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// List all categories, oldest first.
    pub async fn list(&self) -> AppResult<Vec<CategoryView>> {
        let categories = self.category_repo.find_all(self.db.as_ref()).await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, input: UpdateCategoryInput) -> AppResult<CategoryView> {
        input.validate()?;

        let txn = uow::begin(&self.db).await?;
        let result = async {
            let existing = self
                .category_repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

            if let Some(slug) = input.slug.as_set() {
                if *slug != existing.slug
                    && self.category_repo.slug_taken(&txn, slug, Some(id)).await?
                {
                    return Err(AppError::Conflict(SLUG_CONFLICT_MESSAGE.to_string()));
                }
            }

            let mut active = existing.into_active_model();
            if let Patch::Set(name) = input.name {
                active.name = Set(trimmed(name));
            }
            if let Some(description) = input.description.into_nullable() {
                active.description = Set(description.map(trimmed));
            }
            if let Patch::Set(slug) = input.slug {
                active.slug = Set(slug);
            }
            active.updated_at = Set(Some(Utc::now().into()));

            self.category_repo.update(&txn, active).await
        }
        .await;
        let updated = uow::finish(txn, result).await?;

        tracing::info!(category_id = %id, "Category updated");
        Ok(updated.into())
    }

    /// Delete a category and its guide associations.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = async {
            if self.category_repo.delete(&txn, id).await? {
                Ok(())
            } else {
                Err(AppError::NotFound("Category not found".to_string()))
            }
        }
        .await;
        uow::finish(txn, result).await?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_category(slug: &str) -> category::Model {
        category::Model {
            id: Uuid::new_v4(),
            name: "Docs".to_string(),
            description: None,
            slug: slug.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count(n: i64) -> Vec<std::collections::BTreeMap<&'static str, Value>> {
        vec![maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }]
    }

    fn input(name: &str, slug: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
            description: None,
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_category() {
        let stored = create_test_category("docs");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(0)])
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let service = CategoryService::new(db);
        let view = service.create(input("Docs", "docs")).await.unwrap();

        assert_eq!(view.id, stored.id);
        assert_eq!(view.slug, "docs");
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(1)])
                .into_connection(),
        );

        let service = CategoryService::new(db);
        let err = service.create(input("Docs", "docs")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Slug already exists"));
    }

    #[tokio::test]
    async fn test_create_invalid_input_skips_database() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CategoryService::new(db.clone());
        let err = service.create(input("  ", "Bad Slug")).await.unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "slug"]);
        assert_eq!(errors[1].code, "slug_format");

        drop(service);
        let db = Arc::into_inner(db).unwrap();
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let service = CategoryService::new(db);
        let err = service.get(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_null_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = CategoryService::new(db);

        let update: UpdateCategoryInput =
            serde_json::from_value(serde_json::json!({"name": null})).unwrap();
        let err = service.update(Uuid::new_v4(), update).await.unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].code, "null_not_allowed");
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let mut existing = create_test_category("docs");
        existing.description = Some("Old".to_string());
        let mut updated = existing.clone();
        updated.description = None;
        updated.updated_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .append_query_results([[updated.clone()]])
                .into_connection(),
        );

        let service = CategoryService::new(db);
        let update: UpdateCategoryInput =
            serde_json::from_value(serde_json::json!({"description": null})).unwrap();
        let view = service.update(existing.id, update).await.unwrap();

        assert_eq!(view.description, None);
        assert!(view.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let service = CategoryService::new(db);
        let err = service.delete(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
