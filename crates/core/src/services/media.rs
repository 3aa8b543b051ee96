//! Media service.
//!
//! Media rows point at objects held by the configured [`StorageBackend`]
//! (or at any external URL). Uploads write the object first and remove it
//! again if the database work fails; deletes remove the row and its links
//! first and only commit once the object is gone.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use helpcenter_common::validation::validate_not_blank;
use helpcenter_common::{
    AppError, AppResult, FieldError, IdGenerator, Patch, SharedStorage, generate_storage_key,
};
use helpcenter_db::entities::media;
use helpcenter_db::repositories::{AssociationRepository, GuideRepository, MediaRepository};
use helpcenter_db::uow;
use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::fields::FieldChecks;
use super::guide::guide_views;
use crate::views::{GuideView, MediaView};

const URL_MAX_LEN: usize = 2048;
const ALT_MAX_LEN: usize = 500;

/// Accepts absolute http(s) URLs and root-relative paths.
fn validate_media_url(value: &str) -> Result<(), ValidationError> {
    let ok = if value.starts_with('/') {
        !value.starts_with("//")
    } else {
        url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
    };
    if ok {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some(Cow::Borrowed("Must be an http(s) URL or an absolute path"));
    err.add_param(Cow::Borrowed("value"), &value);
    Err(err)
}

/// Input for registering media that already lives at a URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMediaInput {
    #[validate(length(min = 1, max = 2048), custom(function = "validate_media_url"))]
    pub url: String,
    #[validate(length(max = 500), custom(function = "validate_not_blank"))]
    pub alt: Option<String>,
    /// Guides to attach the new item to.
    #[serde(default)]
    pub guide_ids: Vec<Uuid>,
}

/// Partial update of a media item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMediaInput {
    pub url: Patch<String>,
    /// `null` clears the alt text.
    pub alt: Patch<String>,
}

impl UpdateMediaInput {
    fn validate(&self) -> AppResult<()> {
        let mut checks = FieldChecks::new();
        checks.not_null("url", &self.url);
        if let Some(url) = self.url.as_set() {
            checks.length("url", url, 1, URL_MAX_LEN);
            checks.check("url", validate_media_url(url));
        }
        if let Some(alt) = self.alt.as_set() {
            checks.length("alt", alt, 0, ALT_MAX_LEN);
            checks.check("alt", validate_not_blank(alt));
        }
        checks.finish()
    }
}

/// A file received for upload.
#[derive(Debug, Clone)]
pub struct UploadMediaInput {
    /// Client-supplied file name.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Defaults to the file name.
    pub alt: Option<String>,
    /// Guide to attach the new item to.
    pub guide_id: Option<Uuid>,
}

impl UploadMediaInput {
    fn validate(&self) -> AppResult<()> {
        let mut checks = FieldChecks::new();
        let content_type = self.content_type.as_deref().unwrap_or_default();
        if !(content_type.starts_with("image/") || content_type.starts_with("video/")) {
            checks.push(FieldError::new(
                "file",
                "Only image and video files are allowed",
                Value::String(content_type.to_string()),
                "invalid_file_type",
            ));
        }
        if self.data.is_empty() {
            checks.push(FieldError::new(
                "file",
                "File is empty",
                Value::Null,
                "empty_file",
            ));
        }
        if let Some(alt) = &self.alt {
            checks.length("alt", alt, 0, ALT_MAX_LEN);
        }
        checks.finish()
    }
}

/// Service for media items and their guide attachments.
#[derive(Clone)]
pub struct MediaService {
    db: Arc<DatabaseConnection>,
    storage: SharedStorage,
    media_repo: MediaRepository,
    guide_repo: GuideRepository,
    links: AssociationRepository,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, storage: SharedStorage) -> Self {
        Self {
            db,
            storage,
            media_repo: MediaRepository::new(),
            guide_repo: GuideRepository::new(),
            links: AssociationRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Register an existing URL as media.
    pub async fn create(&self, input: CreateMediaInput) -> AppResult<MediaView> {
        input.validate()?;

        let model = media::ActiveModel {
            id: Set(self.id_gen.generate()),
            url: Set(input.url.trim().to_string()),
            alt: Set(input.alt.map(|a| a.trim().to_string())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let guide_ids = input.guide_ids;

        let txn = uow::begin(&self.db).await?;
        let result = async {
            for guide_id in &guide_ids {
                self.ensure_guide(&txn, *guide_id).await?;
            }
            let item = self.media_repo.create(&txn, model).await?;
            for guide_id in &guide_ids {
                self.links.attach_media(&txn, *guide_id, item.id).await?;
            }
            Ok::<_, AppError>(item)
        }
        .await;
        let item = uow::finish(txn, result).await?;

        tracing::info!(media_id = %item.id, "Media created");
        Ok(item.into())
    }

    /// Store an uploaded file and record it as media.
    pub async fn upload(&self, input: UploadMediaInput) -> AppResult<MediaView> {
        input.validate()?;

        let content_type = input.content_type.clone().unwrap_or_default();
        let key = generate_storage_key(&input.filename);
        let stored = self
            .storage
            .upload(&key, &input.filename, &input.data, &content_type)
            .await?;

        let alt = input
            .alt
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .or_else(|| Some(input.filename.clone()).filter(|f| !f.is_empty()));
        let model = media::ActiveModel {
            id: Set(self.id_gen.generate()),
            url: Set(stored.url.clone()),
            alt: Set(alt),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let guide_id = input.guide_id;
        let txn = uow::begin(&self.db).await;
        let result = match txn {
            Ok(txn) => {
                let result = async {
                    if let Some(guide_id) = guide_id {
                        self.ensure_guide(&txn, guide_id).await?;
                    }
                    let item = self.media_repo.create(&txn, model).await?;
                    if let Some(guide_id) = guide_id {
                        self.links.attach_media(&txn, guide_id, item.id).await?;
                    }
                    Ok::<_, AppError>(item)
                }
                .await;
                uow::finish(txn, result).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(item) => {
                tracing::info!(
                    media_id = %item.id,
                    key = %stored.key,
                    size = stored.size,
                    "Media uploaded"
                );
                Ok(item.into())
            }
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    tracing::warn!(key = %stored.key, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(err)
            }
        }
    }

    /// Get a media item by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<MediaView> {
        self.find(self.db.as_ref(), id).await.map(Into::into)
    }

    /// List all media, oldest first.
    pub async fn list(&self) -> AppResult<Vec<MediaView>> {
        let items = self.media_repo.find_all(self.db.as_ref()).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, input: UpdateMediaInput) -> AppResult<MediaView> {
        input.validate()?;

        let txn = uow::begin(&self.db).await?;
        let result = async {
            let mut active = self.find(&txn, id).await?.into_active_model();
            if let Patch::Set(url) = input.url {
                active.url = Set(url.trim().to_string());
            }
            if let Some(alt) = input.alt.into_nullable() {
                active.alt = Set(alt.map(|a| a.trim().to_string()));
            }
            active.updated_at = Set(Some(Utc::now().into()));
            self.media_repo.update(&txn, active).await
        }
        .await;
        let item = uow::finish(txn, result).await?;

        tracing::info!(media_id = %id, "Media updated");
        Ok(item.into())
    }

    /// Delete a media item, its guide links and its stored object.
    ///
    /// The row is only gone once the object is; a storage failure rolls the
    /// delete back.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = async {
            let item = self.find(&txn, id).await?;
            self.media_repo.delete(&txn, id).await?;
            if let Some(key) = self.storage.key_for_url(&item.url) {
                self.storage.delete(&key).await?;
            }
            Ok::<_, AppError>(())
        }
        .await;
        uow::finish(txn, result).await?;

        tracing::info!(media_id = %id, "Media deleted");
        Ok(())
    }

    /// Attach a media item to a guide. Attaching twice is a no-op.
    pub async fn attach(&self, guide_id: Uuid, media_id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = async {
            self.ensure_guide(&txn, guide_id).await?;
            self.find(&txn, media_id).await?;
            self.links.attach_media(&txn, guide_id, media_id).await
        }
        .await;
        let inserted = uow::finish(txn, result).await?;

        tracing::info!(%guide_id, %media_id, inserted, "Media attached to guide");
        Ok(())
    }

    /// Detach a media item from a guide. Detaching a missing link succeeds.
    pub async fn detach(&self, guide_id: Uuid, media_id: Uuid) -> AppResult<()> {
        let txn = uow::begin(&self.db).await?;
        let result = self.links.detach_media(&txn, guide_id, media_id).await;
        let removed = uow::finish(txn, result).await?;

        tracing::info!(%guide_id, %media_id, removed, "Media detached from guide");
        Ok(())
    }

    /// Media attached to a guide.
    pub async fn guide_media(&self, guide_id: Uuid) -> AppResult<Vec<MediaView>> {
        let conn = self.db.as_ref();
        self.ensure_guide(conn, guide_id).await?;
        let items = self.media_repo.find_by_guide(conn, guide_id).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Guides a media item is attached to.
    pub async fn media_guides(&self, media_id: Uuid) -> AppResult<Vec<GuideView>> {
        let conn = self.db.as_ref();
        self.find(conn, media_id).await?;
        let guides = self.guide_repo.find_by_media(conn, media_id).await?;
        guide_views(conn, &self.links, guides).await
    }

    /// URL of a resized rendition of a media item.
    pub async fn optimized_url(
        &self,
        id: Uuid,
        width: Option<u32>,
        height: Option<u32>,
    ) -> AppResult<String> {
        let mut checks = FieldChecks::new();
        for (field, value) in [("width", width), ("height", height)] {
            if let Some(v) = value.filter(|v| !(1..=4096).contains(v)) {
                checks.push(FieldError::new(
                    field,
                    "Must be between 1 and 4096",
                    Value::from(v),
                    "range",
                ));
            }
        }
        checks.finish()?;

        let item = self.find(self.db.as_ref(), id).await?;
        Ok(self.storage.optimized_url(&item.url, width, height))
    }

    async fn find<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<media::Model> {
        self.media_repo
            .find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    async fn ensure_guide<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> AppResult<()> {
        match self.guide_repo.find_by_id(conn, id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Guide not found: {id}"))),
        }
    }
}
