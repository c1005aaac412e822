use uuid::Uuid;

use crate::{
    api::error,
    modules::upload::{
        model::{InsertUpload, UploadSummary},
        schema::{FileType, UploadEntity, UploadStatus},
    },
};

#[async_trait::async_trait]
pub trait UploadRepository {
    async fn create(&self, upload: &InsertUpload) -> Result<UploadEntity, error::SystemError>;

    async fn find_by_id(&self, upload_id: &Uuid)
        -> Result<Option<UploadEntity>, error::SystemError>;

    /// Ownership-scoped lookup; `None` when missing or owned by someone else.
    async fn find_owned(
        &self,
        upload_id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<UploadEntity>, error::SystemError>;

    async fn find_by_owner(&self, owner_id: &Uuid) -> Result<Vec<UploadEntity>, error::SystemError>;

    async fn find_available_for_bidding(
        &self,
        file_type: Option<FileType>,
    ) -> Result<Vec<UploadSummary>, error::SystemError>;

    /// Idempotent.
    async fn mark_unavailable(&self, upload_id: &Uuid) -> Result<(), error::SystemError>;

    /// Ratchets the status forward. Returns `false` when the upload is already in `status` or
    /// the change would regress it.
    async fn set_status(
        &self,
        upload_id: &Uuid,
        status: UploadStatus,
    ) -> Result<bool, error::SystemError>;

    async fn delete(&self, upload_id: &Uuid) -> Result<bool, error::SystemError>;
}
