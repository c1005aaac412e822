use std::path::Path;

use uuid::Uuid;

use crate::api::error;

/// Where the media bytes ended up.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub storage_key: String,
    pub url: String,
    pub preview_url: Option<String>,
}

/// Boundary to the media storage / watermarking service.
#[async_trait::async_trait]
pub trait MediaStorage {
    async fn store(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, error::SystemError>;

    async fn remove(&self, storage_key: &str) -> Result<(), error::SystemError>;
}

/// Writes media to a local directory served under `base_url`. No watermarked preview is produced.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    upload_dir: String,
    base_url: String,
}

impl LocalMediaStorage {
    pub fn new(upload_dir: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self { upload_dir: upload_dir.into(), base_url: base_url.into() }
    }

    fn generate_filename(original_filename: &str) -> String {
        let extension =
            Path::new(original_filename).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let id = Uuid::now_v7();
        if extension.is_empty() {
            id.to_string()
        } else {
            format!("{}.{}", id, extension.to_ascii_lowercase())
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, error::SystemError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let filename = Self::generate_filename(original_filename);
        let file_path = Path::new(&self.upload_dir).join(&filename);
        tokio::fs::write(&file_path, bytes).await?;

        Ok(StoredMedia {
            url: format!("{}/{}", self.base_url.trim_end_matches('/'), filename),
            storage_key: filename,
            preview_url: None,
        })
    }

    async fn remove(&self, storage_key: &str) -> Result<(), error::SystemError> {
        tokio::fs::remove_file(Path::new(&self.upload_dir).join(storage_key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_removes_media_on_disk() {
        let dir = std::env::temp_dir().join(format!("media-bidding-{}", Uuid::now_v7()));
        let storage = LocalMediaStorage::new(dir.to_string_lossy(), "/uploads/");

        let stored = storage.store("Holiday.PNG", b"not really a png").await.unwrap();
        assert!(stored.storage_key.ends_with(".png"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.storage_key));
        assert!(dir.join(&stored.storage_key).exists());

        storage.remove(&stored.storage_key).await.unwrap();
        assert!(!dir.join(&stored.storage_key).exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
