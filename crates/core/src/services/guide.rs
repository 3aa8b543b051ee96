//! Guide service.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use helpcenter_common::error::SLUG_CONFLICT_MESSAGE;
use helpcenter_common::validation::{trimmed, validate_not_blank, validate_slug};
use helpcenter_common::{AppError, AppResult, FieldError, IdGenerator, Patch};
use helpcenter_db::entities::user_guide;
use helpcenter_db::repositories::{
    AssociationRepository, CategoryRepository, GuideRepository, MediaRepository,
};
use helpcenter_db::uow;
use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::fields::FieldChecks;
use crate::body::GuideBody;
use crate::views::GuideView;

/// Maximum number of categories a guide can belong to.
pub const MAX_CATEGORIES_PER_GUIDE: usize = 10;

const TOO_MANY_CATEGORIES: &str = "Cannot associate more than 10 categories with a guide";

/// Input for creating a guide.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuideInput {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    /// Block document, stored as submitted once [`GuideBody::parse`] accepts it.
    pub body: Value,
    #[validate(range(min = 1, max = 300))]
    pub estimated_read_time: i32,
    #[serde(default)]
    #[validate(length(max = 10, message = "Cannot associate more than 10 categories with a guide"))]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub media_ids: Vec<Uuid>,
}

impl CreateGuideInput {
    fn validate_all(&self) -> AppResult<()> {
        let mut checks = FieldChecks::from_derived(self.validate());
        check_body(&mut checks, &self.body);
        checks.finish()
    }
}

/// Partial update of a guide.
///
/// A provided `category_ids` or `media_ids` list replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateGuideInput {
    pub title: Patch<String>,
    pub slug: Patch<String>,
    pub body: Patch<Value>,
    pub estimated_read_time: Patch<i32>,
    pub category_ids: Patch<Vec<Uuid>>,
    pub media_ids: Patch<Vec<Uuid>>,
}

impl UpdateGuideInput {
    fn validate_all(&self) -> AppResult<()> {
        let mut checks = FieldChecks::new();

        checks.not_null("title", &self.title);
        if let Some(title) = self.title.as_set() {
            checks.length("title", title, 1, 200);
            checks.check("title", validate_not_blank(title));
        }
        checks.not_null("slug", &self.slug);
        if let Some(slug) = self.slug.as_set() {
            checks.check("slug", validate_slug(slug));
        }
        checks.not_null("body", &self.body);
        if let Some(raw) = self.body.as_set() {
            check_body(&mut checks, raw);
        }
        checks.not_null("estimated_read_time", &self.estimated_read_time);
        if let Some(&minutes) = self.estimated_read_time.as_set() {
            if !(1..=300).contains(&minutes) {
                checks.push(FieldError::new(
                    "estimated_read_time",
                    "Must be between 1 and 300",
                    Value::from(minutes),
                    "range",
                ));
            }
        }
        checks.not_null("category_ids", &self.category_ids);
        if let Some(ids) = self.category_ids.as_set() {
            if ids.len() > MAX_CATEGORIES_PER_GUIDE {
                checks.push(FieldError::new(
                    "category_ids",
                    TOO_MANY_CATEGORIES,
                    Value::from(ids.len()),
                    "length",
                ));
            }
        }
        checks.not_null("media_ids", &self.media_ids);

        checks.finish()
    }
}

fn check_body(checks: &mut FieldChecks, raw: &Value) {
    if let Err(errors) = GuideBody::parse(raw) {
        checks.extend(errors);
    }
}

/// Service for managing guides and their category/media sets.
#[derive(Clone)]
pub struct GuideService {
    db: Arc<DatabaseConnection>,
    guide_repo: GuideRepository,
    category_repo: CategoryRepository,
    media_repo: MediaRepository,
    links: AssociationRepository,
    id_gen: IdGenerator,
}

impl GuideService {
    /// Create a new guide service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            guide_repo: GuideRepository::new(),
            category_repo: CategoryRepository::new(),
            media_repo: MediaRepository::new(),
            links: AssociationRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a guide and link it to the given categories and media.
    pub async fn create(&self, input: CreateGuideInput) -> AppResult<GuideView> {
        input.validate_all()?;
        let category_ids = sorted_ids(&input.category_ids);
        let media_ids = sorted_ids(&input.media_ids);
        let slug = input.slug;

        let model = user_guide::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(trimmed(input.title)),
            slug: Set(slug.clone()),
            body: Set(input.body),
            estimated_read_time: Set(input.estimated_read_time),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let txn = uow::begin(&self.db).await?;
        let result = async {
            if self.guide_repo.slug_taken(&txn, &slug, None).await? {
                return Err(AppError::Conflict(SLUG_CONFLICT_MESSAGE.to_string()));
            }
            self.ensure_categories(&txn, &category_ids).await?;
            self.ensure_media(&txn, &media_ids).await?;

            let guide = self.guide_repo.create(&txn, model).await?;
            self.links
                .replace_guide_categories(&txn, guide.id, &category_ids)
                .await?;
            self.links
                .replace_guide_media(&txn, guide.id, &media_ids)
                .await?;
            Ok(guide)
        }
        .await;
        let guide = uow::finish(txn, result).await?;

        tracing::info!(guide_id = %guide.id, slug = %guide.slug, "Guide created");
        Ok(GuideView::new(guide, category_ids, media_ids))
    }

    /// Get a guide by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<GuideView> {
        let guide = self
            .guide_repo
            .find_by_id(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| AppError::NotFound("Guide not found".to_string()))?;
        self.single_view(guide).await
    }

    /// Get a guide by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<GuideView> {
        let guide = self
            .guide_repo
            .find_by_slug(self.db.as_ref(), slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Guide not found".to_string()))?;
        self.single_view(guide).await
    }

    /// List guides, optionally only those in the category with `category_slug`.
    ///
    /// An unknown category slug yields an empty list.
    pub async fn list(&self, category_slug: Option<&str>) -> AppResult<Vec<GuideView>> {
        let conn = self.db.as_ref();
        let guides = match category_slug {
            Some(slug) => match self.category_repo.find_by_slug(conn, slug).await? {
                Some(category) => self.guide_repo.find_by_category(conn, category.id).await?,
                None => return Ok(Vec::new()),
            },
            None => self.guide_repo.find_all(conn).await?,
        };
        guide_views(conn, &self.links, guides).await
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, input: UpdateGuideInput) -> AppResult<GuideView> {
        input.validate_all()?;
        let category_ids = input.category_ids.as_set().map(|ids| sorted_ids(ids));
        let media_ids = input.media_ids.as_set().map(|ids| sorted_ids(ids));

        let txn = uow::begin(&self.db).await?;
        let result = async {
            let existing = self
                .guide_repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Guide not found".to_string()))?;

            if let Some(slug) = input.slug.as_set() {
                if *slug != existing.slug && self.guide_repo.slug_taken(&txn, slug, Some(id)).await? {
                    return Err(AppError::Conflict(SLUG_CONFLICT_MESSAGE.to_string()));
                }
            }
            if let Some(ids) = &category_ids {
                self.ensure_categories(&txn, ids).await?;
            }
            if let Some(ids) = &media_ids {
                self.ensure_media(&txn, ids).await?;
            }

            let mut active = existing.into_active_model();
            if let Patch::Set(title) = input.title {
                active.title = Set(trimmed(title));
            }
            if let Patch::Set(slug) = input.slug {
                active.slug = Set(slug);
            }
            if let Patch::Set(body) = input.body {
                active.body = Set(body);
            }
            if let Patch::Set(minutes) = input.estimated_read_time {
                active.estimated_read_time = Set(minutes);
            }
            active.updated_at = Set(Some(Utc::now().into()));
            let guide = self.guide_repo.update(&txn, active).await?;

            if let Some(ids) = &category_ids {
                self.links.replace_guide_categories(&txn, id, ids).await?;
            }
            if let Some(ids) = &media_ids {
                self.links.replace_guide_media(&txn, id, ids).await?;
            }

            let mut views = guide_views(&txn, &self.links, vec![guide]).await?;
            views
                .pop()
                .ok_or_else(|| AppError::Internal("Updated guide vanished".to_string()))
        }
        .await;
        let view = uow::finish(txn, result).await?;

        tracing::info!(guide_id = %id, "Guide updated");
        Ok(view)
    }

    /// Delete a guide and its category and media associations.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = async {
            if self.guide_repo.delete(&txn, id).await? {
                Ok(())
            } else {
                Err(AppError::NotFound("Guide not found".to_string()))
            }
        }
        .await;
        uow::finish(txn, result).await?;

        tracing::info!(guide_id = %id, "Guide deleted");
        Ok(())
    }

    async fn single_view(&self, guide: user_guide::Model) -> AppResult<GuideView> {
        let mut views = guide_views(self.db.as_ref(), &self.links, vec![guide]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Guide view missing".to_string()))
    }

    async fn ensure_categories<C: ConnectionTrait>(&self, conn: &C, ids: &[Uuid]) -> AppResult<()> {
        let found = self.category_repo.find_by_ids(conn, ids).await?;
        let found: HashSet<Uuid> = found.into_iter().map(|c| c.id).collect();
        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(AppError::NotFound(format!("Category not found: {missing}"))),
            None => Ok(()),
        }
    }

    async fn ensure_media<C: ConnectionTrait>(&self, conn: &C, ids: &[Uuid]) -> AppResult<()> {
        let found = self.media_repo.find_by_ids(conn, ids).await?;
        let found: HashSet<Uuid> = found.into_iter().map(|m| m.id).collect();
        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(AppError::NotFound(format!("Media not found: {missing}"))),
            None => Ok(()),
        }
    }
}

/// Attach association ids to guide rows with one lookup per link kind.
pub(crate) async fn guide_views<C: ConnectionTrait>(
    conn: &C,
    links: &AssociationRepository,
    guides: Vec<user_guide::Model>,
) -> AppResult<Vec<GuideView>> {
    let ids: Vec<Uuid> = guides.iter().map(|g| g.id).collect();

    let mut categories: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links.category_links_for_guides(conn, &ids).await? {
        categories.entry(link.guide_id).or_default().push(link.category_id);
    }
    let mut media: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links.media_links_for_guides(conn, &ids).await? {
        media.entry(link.guide_id).or_default().push(link.media_id);
    }

    Ok(guides
        .into_iter()
        .map(|g| {
            let category_ids = categories.remove(&g.id).unwrap_or_default();
            let media_ids = media.remove(&g.id).unwrap_or_default();
            GuideView::new(g, category_ids, media_ids)
        })
        .collect())
}

/// Unique ids in ascending order, the order link lookups return them in.
fn sorted_ids(ids: &[Uuid]) -> Vec<Uuid> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpcenter_db::entities::{category, guide_category_link, guide_media_link};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn count(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    fn welcome_body() -> Value {
        json!({"blocks": [
            {"type": "heading", "level": 1, "text": "Welcome"},
            {"type": "paragraph", "text": "Hi"}
        ]})
    }

    fn create_test_guide(slug: &str) -> user_guide::Model {
        user_guide::Model {
            id: Uuid::new_v4(),
            title: "Getting started".to_string(),
            slug: slug.to_string(),
            body: welcome_body(),
            estimated_read_time: 5,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_category(id: Uuid) -> category::Model {
        category::Model {
            id,
            name: "Docs".to_string(),
            description: None,
            slug: "docs".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn input(slug: &str) -> CreateGuideInput {
        CreateGuideInput {
            title: "Getting started".to_string(),
            slug: slug.to_string(),
            body: welcome_body(),
            estimated_read_time: 5,
            category_ids: Vec::new(),
            media_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_guide_keeps_body() {
        let stored = create_test_guide("getting-started");
        let category_id = Uuid::new_v4();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(0)])
                .append_query_results([[create_test_category(category_id)]])
                .append_query_results([[stored.clone()]])
                .append_exec_results([exec(0), exec(1), exec(0)])
                .into_connection(),
        );

        let service = GuideService::new(db);
        let mut create = input("getting-started");
        create.category_ids = vec![category_id, category_id];
        let view = service.create(create).await.unwrap();

        assert_eq!(view.body, welcome_body());
        assert_eq!(view.body["blocks"][0]["type"], "heading");
        assert_eq!(view.category_ids, vec![category_id]);
        assert!(view.media_ids.is_empty());
    }

    #[tokio::test]
    async fn test_create_stores_submitted_body_verbatim() {
        let submitted = json!({"version": 2, "blocks": [
            {"type": "heading", "level": 2, "text": "Steps", "id": "h-1"},
            {"type": "list", "items": ["a", "b"], "style": "ordered"}
        ]});
        let mut stored = create_test_guide("steps");
        stored.body = submitted.clone();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(0)])
                .append_query_results([[stored]])
                .append_exec_results([exec(0), exec(0)])
                .into_connection(),
        );

        let service = GuideService::new(db.clone());
        let mut create = input("steps");
        create.body = submitted.clone();
        let view = service.create(create).await.unwrap();
        drop(service);

        assert_eq!(view.body, submitted);
        let log = format!("{:?}", Arc::into_inner(db).unwrap().into_transaction_log());
        let insert = &log[log.find("INSERT INTO").unwrap()..];
        assert!(insert.contains("h-1"));
        assert!(insert.contains("ordered"));
        assert!(insert.contains("version"));
    }

    #[tokio::test]
    async fn test_create_returns_association_ids_sorted() {
        let mut ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();
        let [low, mid, high] = ids;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(0)])
                .append_query_results([vec![
                    create_test_category(low),
                    create_test_category(mid),
                    create_test_category(high),
                ]])
                .append_query_results([[create_test_guide("getting-started")]])
                .append_exec_results([exec(0), exec(3), exec(0)])
                .into_connection(),
        );

        let service = GuideService::new(db);
        let mut create = input("getting-started");
        create.category_ids = vec![high, low, mid, low];
        let view = service.create(create).await.unwrap();

        assert_eq!(view.category_ids, vec![low, mid, high]);
    }

    #[tokio::test]
    async fn test_create_unknown_category_is_not_found() {
        let missing = Uuid::new_v4();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count(0)])
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let service = GuideService::new(db);
        let mut create = input("getting-started");
        create.category_ids = vec![missing];
        let err = service.create(create).await.unwrap_err();

        assert!(
            matches!(err, AppError::NotFound(ref msg) if *msg == format!("Category not found: {missing}"))
        );
    }

    #[tokio::test]
    async fn test_create_collects_field_and_body_errors() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GuideService::new(db);

        let mut create = input("ok-slug");
        create.estimated_read_time = 0;
        create.category_ids = (0..11).map(|_| Uuid::new_v4()).collect();
        create.body = json!({"blocks": [{"type": "heading", "level": 9, "text": "x"}]});

        let AppError::Validation(errors) = service.create(create).await.unwrap_err() else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["category_ids", "estimated_read_time", "body.blocks[0].level"]
        );
        assert_eq!(errors[0].message, TOO_MANY_CATEGORIES);
    }

    #[tokio::test]
    async fn test_get_includes_association_ids() {
        let guide = create_test_guide("faq");
        let category_id = Uuid::new_v4();
        let media_id = Uuid::new_v4();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[guide.clone()]])
                .append_query_results([[guide_category_link::Model {
                    guide_id: guide.id,
                    category_id,
                }]])
                .append_query_results([[guide_media_link::Model {
                    guide_id: guide.id,
                    media_id,
                }]])
                .into_connection(),
        );

        let service = GuideService::new(db);
        let view = service.get(guide.id).await.unwrap();

        assert_eq!(view.category_ids, vec![category_id]);
        assert_eq!(view.media_ids, vec![media_id]);
    }

    #[tokio::test]
    async fn test_list_unknown_category_slug_is_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let service = GuideService::new(db);
        let guides = service.list(Some("missing")).await.unwrap();

        assert!(guides.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_null_body() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GuideService::new(db);

        let update: UpdateGuideInput = serde_json::from_value(json!({"body": null})).unwrap();
        let AppError::Validation(errors) = service.update(Uuid::new_v4(), update).await.unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "body");
        assert_eq!(errors[0].code, "null_not_allowed");
    }

    #[tokio::test]
    async fn test_delete_removes_links_first() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(2), exec(1)])
                .into_connection(),
        );

        let service = GuideService::new(db.clone());
        service.delete(Uuid::new_v4()).await.unwrap();
        drop(service);

        let log = format!("{:?}", Arc::into_inner(db).unwrap().into_transaction_log());
        let categories = log.find("guide_category_link").unwrap();
        let media = log.find("guide_media_link").unwrap();
        let guide = log.find("DELETE FROM \\\"user_guide\\\"").unwrap();
        assert!(categories < guide);
        assert!(media < guide);
        assert!(log.contains("COMMIT"));
    }
}
