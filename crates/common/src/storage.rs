//! Object storage abstraction for media uploads.
//!
//! Two backends ship: [`LocalStorage`] writes under a directory and serves
//! files from a URL prefix, [`PlaceholderStorage`] is used when no store is
//! configured and hands out placeholder image URLs.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::config::{StorageKind, StorageSettings};
use crate::{AppError, AppResult};

/// Uploaded file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file. `filename` is the client-supplied name.
    async fn upload(
        &self,
        key: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile>;

    /// Delete a file. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Recover the key for a URL this backend produced.
    ///
    /// Returns `None` for URLs owned by something else.
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// URL for a resized rendition. Foreign URLs are returned unchanged.
    fn optimized_url(&self, url: &str, width: Option<u32>, height: Option<u32>) -> String {
        if self.key_for_url(url).is_none() {
            return url.to_string();
        }
        with_size_params(url, width, height)
    }
}

/// Shared handle to the configured backend.
pub type SharedStorage = Arc<dyn StorageBackend>;

/// Build the backend selected in configuration.
#[must_use]
pub fn from_settings(settings: &StorageSettings) -> SharedStorage {
    match settings.backend {
        StorageKind::Placeholder => Arc::new(PlaceholderStorage),
        StorageKind::Local => Arc::new(LocalStorage::new(
            settings.base_path.clone(),
            settings.base_url.clone(),
        )),
    }
}

fn with_size_params(url: &str, width: Option<u32>, height: Option<u32>) -> String {
    if width.is_none() && height.is_none() {
        return url.to_string();
    }

    // Relative URLs (local backend without a host) are handled textually.
    match Url::parse(url) {
        Ok(mut parsed) => {
            {
                let mut pairs = parsed.query_pairs_mut();
                if let Some(w) = width {
                    pairs.append_pair("w", &w.to_string());
                }
                if let Some(h) = height {
                    pairs.append_pair("h", &h.to_string());
                }
            }
            parsed.to_string()
        }
        Err(_) => {
            let mut params = Vec::new();
            if let Some(w) = width {
                params.push(format!("w={w}"));
            }
            if let Some(h) = height {
                params.push(format!("h={h}"));
            }
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}{}", params.join("&"))
        }
    }
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self { base_path, base_url }
    }

    fn prefix(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        _filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{key}", self.prefix())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        tokio::fs::try_exists(self.base_path.join(key))
            .await
            .map_err(|e| AppError::Storage(format!("Failed to stat file: {e}")))
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let path = url.split('?').next().unwrap_or(url);
        path.strip_prefix(&self.prefix())
            .filter(|key| !key.is_empty() && !key.split('/').any(|seg| seg == ".."))
            .map(ToString::to_string)
    }
}

/// Backend used when no object store is configured.
///
/// Nothing is persisted; uploads resolve to a placeholder image showing the
/// file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderStorage;

impl PlaceholderStorage {
    /// Base URL of generated placeholder images.
    pub const BASE_URL: &'static str = "https://via.placeholder.com/300x200/0066CC/FFFFFF";
}

#[async_trait::async_trait]
impl StorageBackend for PlaceholderStorage {
    async fn upload(
        &self,
        key: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let text = if filename.is_empty() {
            "uploaded-image"
        } else {
            filename
        };
        let mut url = Url::parse(Self::BASE_URL)
            .map_err(|e| AppError::Internal(format!("Invalid placeholder URL: {e}")))?;
        url.query_pairs_mut().append_pair("text", text);

        Ok(UploadedFile {
            key: key.to_string(),
            url: url.to_string(),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: format!("{:x}", md5::compute(data)),
        })
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}?text={key}", Self::BASE_URL)
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(false)
    }

    fn key_for_url(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Generate a unique storage key for an uploaded file.
#[must_use]
pub fn generate_storage_key(original_name: &str) -> String {
    use chrono::Utc;

    let timestamp = Utc::now().timestamp_millis();

    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);

    format!("helpcenter/{timestamp}_{}.{extension}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("photo.JPG");
        assert!(key.starts_with("helpcenter/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_generate_storage_key_no_extension() {
        assert!(generate_storage_key("file").ends_with(".bin"));
        assert!(generate_storage_key(".hidden").ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_placeholder_upload_url() {
        let storage = PlaceholderStorage;
        let file = storage
            .upload("helpcenter/k.png", "diagram.png", b"png", "image/png")
            .await
            .unwrap();
        assert_eq!(
            file.url,
            "https://via.placeholder.com/300x200/0066CC/FFFFFF?text=diagram.png"
        );
        assert_eq!(file.size, 3);
    }

    #[test]
    fn test_local_key_for_url() {
        let storage = LocalStorage::new(PathBuf::from("/tmp/files"), "/files/".to_string());
        assert_eq!(
            storage.key_for_url("/files/helpcenter/a.png").as_deref(),
            Some("helpcenter/a.png")
        );
        assert_eq!(storage.key_for_url("https://elsewhere.test/a.png"), None);
        assert_eq!(storage.key_for_url("/files/../etc/passwd"), None);
    }

    #[test]
    fn test_optimized_url() {
        let storage = LocalStorage::new(
            PathBuf::from("/tmp/files"),
            "https://cdn.example.com/files".to_string(),
        );
        assert_eq!(
            storage.optimized_url("https://cdn.example.com/files/a.png", Some(300), None),
            "https://cdn.example.com/files/a.png?w=300"
        );
        assert_eq!(
            storage.optimized_url("https://other.example.com/a.png", Some(300), Some(200)),
            "https://other.example.com/a.png"
        );

        let relative = LocalStorage::new(PathBuf::from("/tmp/files"), "/files".to_string());
        assert_eq!(
            relative.optimized_url("/files/a.png", Some(10), Some(20)),
            "/files/a.png?w=10&h=20"
        );
    }

    #[tokio::test]
    async fn test_local_upload_and_delete() {
        let dir = std::env::temp_dir().join(format!("helpcenter-test-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/files".to_string());

        let file = storage
            .upload("helpcenter/x.txt", "x.txt", b"hello", "text/plain")
            .await
            .unwrap();
        assert_eq!(file.url, "/files/helpcenter/x.txt");
        assert!(storage.exists("helpcenter/x.txt").await.unwrap());

        storage.delete("helpcenter/x.txt").await.unwrap();
        assert!(!storage.exists("helpcenter/x.txt").await.unwrap());
        // Second delete is a no-op.
        storage.delete("helpcenter/x.txt").await.unwrap();

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
