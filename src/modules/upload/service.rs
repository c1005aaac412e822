use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::upload::{
    model::{InsertUpload, UploadConfig, UploadForm},
    repository::UploadRepository,
    schema::UploadEntity,
    storage::MediaStorage,
};

#[derive(Clone)]
pub struct UploadService<R>
where
    R: UploadRepository + Send + Sync,
{
    upload_repo: Arc<R>,
    storage: Arc<dyn MediaStorage + Send + Sync>,
    config: UploadConfig,
}

impl<R> UploadService<R>
where
    R: UploadRepository + Send + Sync,
{
    pub fn new(
        upload_repo: Arc<R>,
        storage: Arc<dyn MediaStorage + Send + Sync>,
        config: UploadConfig,
    ) -> Self {
        Self { upload_repo, storage, config }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size
    }

    /// Resolves the MIME type, falling back to a guess from the filename.
    pub fn resolve_mime_type(filename: &str, declared: Option<String>) -> String {
        declared
            .filter(|m| m != "application/octet-stream")
            .unwrap_or_else(|| mime_guess::from_path(filename).first_or_octet_stream().to_string())
    }

    /// Stores the media and records an upload that is immediately open for bidding.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        form: UploadForm,
        original_filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> Result<UploadEntity, error::SystemError> {
        if bytes.is_empty() {
            return Err(error::SystemError::bad_request("Uploaded file is empty"));
        }

        if bytes.len() > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        let file_type = self.config.classify(&mime_type).ok_or_else(|| {
            error::SystemError::bad_request(format!(
                "File type '{}' is not allowed. Only JPG, JPEG, PNG images and MP4, MOV, AVI videos are accepted",
                mime_type
            ))
        })?;

        let stored = self.storage.store(&original_filename, &bytes).await?;

        let insert = InsertUpload {
            user_id: owner_id,
            title: form.title,
            description: form.description,
            filename: original_filename,
            file_url: stored.url,
            storage_key: stored.storage_key.clone(),
            file_type,
            file_size: bytes.len() as i64,
            watermarked_preview_url: stored.preview_url,
        };

        match self.upload_repo.create(&insert).await {
            Ok(upload) => {
                log::info!("Upload {} created by {}", upload.id, owner_id);
                Ok(upload)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&stored.storage_key).await {
                    log::warn!("Failed to remove orphaned media {}: {:?}", stored.storage_key, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn list_mine(&self, owner_id: Uuid) -> Result<Vec<UploadEntity>, error::SystemError> {
        self.upload_repo.find_by_owner(&owner_id).await
    }

    /// Deletes an owned upload; its bids are removed with it.
    pub async fn delete(&self, upload_id: Uuid, owner_id: Uuid) -> Result<(), error::SystemError> {
        let upload = self
            .upload_repo
            .find_owned(&upload_id, &owner_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Upload not found or access denied"))?;

        self.upload_repo.delete(&upload.id).await?;

        if let Err(e) = self.storage.remove(&upload.storage_key).await {
            log::warn!("Failed to remove media for upload {}: {:?}", upload.id, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{InMemoryStore, MemoryStorage};

    fn service(store: Arc<InMemoryStore>) -> UploadService<InMemoryStore> {
        UploadService::new(store, Arc::new(MemoryStorage::default()), UploadConfig::default())
    }

    fn form() -> UploadForm {
        UploadForm { title: "Harbour at dawn".into(), description: "Fishing boats".into() }
    }

    #[test]
    fn mime_type_is_guessed_from_filename() {
        let guessed = UploadService::<InMemoryStore>::resolve_mime_type("clip.mp4", None);
        assert_eq!(guessed, "video/mp4");

        let declared = UploadService::<InMemoryStore>::resolve_mime_type(
            "clip.bin",
            Some("image/png".into()),
        );
        assert_eq!(declared, "image/png");
    }

    #[tokio::test]
    async fn new_upload_is_open_for_bidding() {
        let store = Arc::new(InMemoryStore::default());
        let owner = store.add_user("creator");
        let svc = service(store.clone());

        let upload = svc
            .upload(owner, form(), "dawn.png".into(), "image/png".into(), vec![1, 2, 3])
            .await
            .unwrap();

        assert!(upload.is_available_for_bidding);
        assert_eq!(upload.file_size, 3);
        assert_eq!(svc.list_mine(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_unsupported_and_empty_files() {
        let store = Arc::new(InMemoryStore::default());
        let owner = store.add_user("creator");
        let svc = service(store);

        let err = svc
            .upload(owner, form(), "notes.pdf".into(), "application/pdf".into(), vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc
            .upload(owner, form(), "dawn.png".into(), "image/png".into(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn only_owner_can_delete() {
        let store = Arc::new(InMemoryStore::default());
        let owner = store.add_user("creator");
        let stranger = store.add_user("stranger");
        let svc = service(store.clone());

        let upload = svc
            .upload(owner, form(), "dawn.png".into(), "image/png".into(), vec![1])
            .await
            .unwrap();

        let err = svc.delete(upload.id, stranger).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        svc.delete(upload.id, owner).await.unwrap();
        assert!(store.upload(&upload.id).is_none());
    }
}
