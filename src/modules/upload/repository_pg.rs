use uuid::Uuid;

use crate::{
    api::error,
    modules::upload::{
        model::{InsertUpload, UploadSummary},
        repository::UploadRepository,
        schema::{FileType, UploadEntity, UploadStatus},
    },
};

#[derive(Clone)]
pub struct UploadRepositoryPg {
    pool: sqlx::PgPool,
}

impl UploadRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UploadRepository for UploadRepositoryPg {
    async fn create(&self, upload: &InsertUpload) -> Result<UploadEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, UploadEntity>(
            r#"
            INSERT INTO uploads (
                id, user_id, title, description, filename, file_url, storage_key,
                file_type, file_size, watermarked_preview_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(upload.user_id)
        .bind(&upload.title)
        .bind(&upload.description)
        .bind(&upload.filename)
        .bind(&upload.file_url)
        .bind(&upload.storage_key)
        .bind(upload.file_type)
        .bind(upload.file_size)
        .bind(&upload.watermarked_preview_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn find_by_id(
        &self,
        upload_id: &Uuid,
    ) -> Result<Option<UploadEntity>, error::SystemError> {
        let upload = sqlx::query_as::<_, UploadEntity>("SELECT * FROM uploads WHERE id = $1")
            .bind(upload_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(upload)
    }

    async fn find_owned(
        &self,
        upload_id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<UploadEntity>, error::SystemError> {
        let upload = sqlx::query_as::<_, UploadEntity>(
            "SELECT * FROM uploads WHERE id = $1 AND user_id = $2",
        )
        .bind(upload_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(upload)
    }

    async fn find_by_owner(&self, owner_id: &Uuid) -> Result<Vec<UploadEntity>, error::SystemError> {
        let uploads = sqlx::query_as::<_, UploadEntity>(
            "SELECT * FROM uploads WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }

    async fn find_available_for_bidding(
        &self,
        file_type: Option<FileType>,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        let uploads = sqlx::query_as::<_, UploadSummary>(
            r#"
            SELECT
                up.id,
                up.title,
                up.description,
                up.filename,
                up.file_type,
                up.file_size,
                up.watermarked_preview_url,
                u.id AS uploader_id,
                u.username AS uploader_username,
                up.created_at
            FROM uploads up
            JOIN users u
                ON u.id = up.user_id
            WHERE up.is_available_for_bidding = TRUE
              AND ($1::file_type IS NULL OR up.file_type = $1)
            ORDER BY up.created_at DESC
            "#,
        )
        .bind(file_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }

    async fn mark_unavailable(&self, upload_id: &Uuid) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            UPDATE uploads
            SET is_available_for_bidding = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_available_for_bidding = TRUE
            "#,
        )
        .bind(upload_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_status(
        &self,
        upload_id: &Uuid,
        status: UploadStatus,
    ) -> Result<bool, error::SystemError> {
        let from: Vec<&str> = status.predecessors().iter().map(UploadStatus::as_str).collect();

        let rows = sqlx::query(
            r#"
            UPDATE uploads
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status::text = ANY($3)
            "#,
        )
        .bind(upload_id)
        .bind(status)
        .bind(from)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete(&self, upload_id: &Uuid) -> Result<bool, error::SystemError> {
        // bids go with it (ON DELETE CASCADE)
        let rows = sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(upload_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::pg::{seed_upload, seed_user};

    #[sqlx::test(migrations = "./migrations")]
    async fn status_only_ratchets_forward(pool: sqlx::PgPool) {
        let owner = seed_user(&pool, "creator").await;
        let upload = seed_upload(&pool, owner, "Harbour at dawn").await;
        let repo = UploadRepositoryPg::new(pool);

        assert!(repo.set_status(&upload, UploadStatus::BidReceived).await.unwrap());
        assert!(!repo.set_status(&upload, UploadStatus::BidReceived).await.unwrap());
        assert!(!repo.set_status(&upload, UploadStatus::Pending).await.unwrap());
        assert!(!repo.set_status(&upload, UploadStatus::Completed).await.unwrap());

        assert!(repo.set_status(&upload, UploadStatus::Accepted).await.unwrap());
        assert!(!repo.set_status(&upload, UploadStatus::Rejected).await.unwrap());
        assert!(!repo.set_status(&upload, UploadStatus::BidReceived).await.unwrap());
        assert!(repo.set_status(&upload, UploadStatus::Completed).await.unwrap());

        let stored = repo.find_by_id(&upload).await.unwrap().unwrap();
        assert_eq!(stored.status, UploadStatus::Completed);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn closing_is_idempotent_and_hides_the_upload(pool: sqlx::PgPool) {
        let owner = seed_user(&pool, "creator").await;
        let open = seed_upload(&pool, owner, "Open").await;
        let closed = seed_upload(&pool, owner, "Closed").await;
        let repo = UploadRepositoryPg::new(pool);

        repo.mark_unavailable(&closed).await.unwrap();
        let first = repo.find_by_id(&closed).await.unwrap().unwrap();
        repo.mark_unavailable(&closed).await.unwrap();
        let second = repo.find_by_id(&closed).await.unwrap().unwrap();
        assert!(!second.is_available_for_bidding);
        assert_eq!(first.updated_at, second.updated_at);

        let available = repo.find_available_for_bidding(None).await.unwrap();
        assert_eq!(available.iter().map(|u| u.id).collect::<Vec<_>>(), vec![open]);
        assert_eq!(available[0].uploader_username, "creator");
        assert!(repo.find_available_for_bidding(Some(FileType::Video)).await.unwrap().is_empty());
    }
}
