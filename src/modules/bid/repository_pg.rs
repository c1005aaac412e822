use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        bid::{
            model::{AcceptOutcome, InsertBid, WithdrawOutcome},
            repository::{BidRepo, BidRepository},
            schema::{BidDetail, BidEntity, BidStatus},
        },
        upload::schema::{UploadEntity, UploadStatus},
    },
};

const DETAIL_SELECT: &str = r#"
    SELECT
        b.*,
        c.company_name,
        up.user_id AS upload_owner_id,
        up.title AS upload_title
    FROM bids b
    JOIN companies c
        ON c.id = b.company_id
    JOIN uploads up
        ON up.id = b.upload_id
"#;

#[derive(Clone)]
pub struct BidRepositoryPg {
    pool: sqlx::PgPool,
}

impl BidRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BidRepository for BidRepositoryPg {
    async fn create(&self, bid: &InsertBid) -> Result<BidEntity, error::SystemError> {
        // FOR SHARE waits out an open accept/withdraw on the upload and re-checks availability
        // once it commits, so no pending bid lands behind a cascade
        let result = sqlx::query_as::<_, BidEntity>(
            r#"
            INSERT INTO bids (id, upload_id, company_id, amount, message, status, expires_at)
            SELECT $1, up.id, $3, $4, $5, 'pending', $6
            FROM uploads up
            WHERE up.id = $2 AND up.is_available_for_bidding = TRUE
            FOR SHARE OF up
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(bid.upload_id)
        .bind(bid.company_id)
        .bind(bid.amount)
        .bind(&bid.message)
        .bind(bid.expires_at)
        .fetch_optional(&self.pool)
        .await;

        // the partial unique index catches duplicates that race past the engine's check
        match result.map_err(error::SystemError::from) {
            Ok(Some(bid)) => Ok(bid),
            Ok(None) => {
                Err(error::SystemError::not_found("Upload not found or not available for bidding"))
            }
            Err(error::SystemError::UniqueViolation(_)) => Err(error::SystemError::conflict(
                "You already have a pending bid for this upload",
            )),
            Err(e) => Err(e),
        }
    }

    async fn find_by_id(&self, bid_id: &Uuid) -> Result<Option<BidEntity>, error::SystemError> {
        let bid = sqlx::query_as::<_, BidEntity>("SELECT * FROM bids WHERE id = $1")
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bid)
    }

    async fn find_detail_by_id(
        &self,
        bid_id: &Uuid,
    ) -> Result<Option<BidDetail>, error::SystemError> {
        let detail = sqlx::query_as::<_, BidDetail>(&format!("{DETAIL_SELECT} WHERE b.id = $1"))
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn find_pending_by_upload_and_company(
        &self,
        upload_id: &Uuid,
        company_id: &Uuid,
    ) -> Result<Option<BidEntity>, error::SystemError> {
        let bid = sqlx::query_as::<_, BidEntity>(
            "SELECT * FROM bids WHERE upload_id = $1 AND company_id = $2 AND status = 'pending'",
        )
        .bind(upload_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bid)
    }

    async fn list_by_upload(&self, upload_id: &Uuid) -> Result<Vec<BidDetail>, error::SystemError> {
        let bids = sqlx::query_as::<_, BidDetail>(&format!(
            "{DETAIL_SELECT} WHERE b.upload_id = $1 ORDER BY b.created_at DESC"
        ))
        .bind(upload_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bids)
    }

    async fn list_by_company(
        &self,
        company_id: &Uuid,
    ) -> Result<Vec<BidDetail>, error::SystemError> {
        let bids = sqlx::query_as::<_, BidDetail>(&format!(
            "{DETAIL_SELECT} WHERE b.company_id = $1 ORDER BY b.created_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bids)
    }

    async fn update_status(
        &self,
        bid_id: &Uuid,
        status: BidStatus,
    ) -> Result<BidEntity, error::SystemError> {
        let updated = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(bid_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(bid) = updated {
            return Ok(bid);
        }

        match self.find_by_id(bid_id).await? {
            Some(_) => Err(error::SystemError::invalid_transition("Bid status cannot be changed")),
            None => Err(error::SystemError::not_found("Bid not found")),
        }
    }

    async fn reject_pending_for_upload(
        &self,
        upload_id: &Uuid,
    ) -> Result<Vec<BidEntity>, error::SystemError> {
        let rejected = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET status = 'rejected', updated_at = NOW()
            WHERE upload_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rejected)
    }

    async fn mark_paid(
        &self,
        bid_id: &Uuid,
        transaction_id: &str,
    ) -> Result<Option<BidEntity>, error::SystemError> {
        let bid = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET is_paid = TRUE, payment_transaction_id = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'accepted' AND is_paid = FALSE
            RETURNING *
            "#,
        )
        .bind(bid_id)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bid)
    }

    async fn expire_overdue(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE bids
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'pending' AND expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl BidRepo for BidRepositoryPg {
    async fn accept_bid_atomic(
        &self,
        bid_id: &Uuid,
        upload_id: &Uuid,
    ) -> Result<AcceptOutcome, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the upload serializes racing acceptances; the loser re-reads
        // is_available_for_bidding = FALSE and matches nothing.
        let closed = sqlx::query(
            r#"
            UPDATE uploads
            SET is_available_for_bidding = FALSE, status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND is_available_for_bidding = TRUE
            "#,
        )
        .bind(upload_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if closed == 0 {
            tx.rollback().await?;
            return Err(error::SystemError::invalid_transition(
                "Upload is no longer available for bidding",
            ));
        }

        let accepted = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND upload_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(bid_id)
        .bind(upload_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(accepted) = accepted else {
            tx.rollback().await?;
            return Err(error::SystemError::invalid_transition("Bid status cannot be changed"));
        };

        let rejected = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET status = 'rejected', updated_at = NOW()
            WHERE upload_id = $1 AND status = 'pending' AND id <> $2
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .bind(bid_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(AcceptOutcome { accepted, rejected })
    }

    async fn withdraw_upload_atomic(
        &self,
        upload_id: &Uuid,
    ) -> Result<WithdrawOutcome, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // same row lock as an acceptance, so exactly one of the two wins
        let status = sqlx::query_scalar::<_, UploadStatus>(
            "SELECT status FROM uploads WHERE id = $1 FOR UPDATE",
        )
        .bind(upload_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(status) = status else {
            tx.rollback().await?;
            return Err(error::SystemError::not_found("Upload not found"));
        };

        if matches!(status, UploadStatus::Accepted | UploadStatus::Completed) {
            tx.rollback().await?;
            return Err(error::SystemError::invalid_transition(
                "A bid has already been accepted for this upload",
            ));
        }

        let upload = sqlx::query_as::<_, UploadEntity>(
            r#"
            UPDATE uploads
            SET is_available_for_bidding = FALSE,
                status = 'rejected',
                updated_at = CASE WHEN status = 'rejected' THEN updated_at ELSE NOW() END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .fetch_one(&mut *tx)
        .await?;

        let rejected = sqlx::query_as::<_, BidEntity>(
            r#"
            UPDATE bids
            SET status = 'rejected', updated_at = NOW()
            WHERE upload_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(WithdrawOutcome { upload, rejected })
    }
}
