use uuid::Uuid;

use crate::{
    api::error,
    modules::bid::{
        model::{AcceptOutcome, InsertBid, WithdrawOutcome},
        schema::{BidDetail, BidEntity, BidStatus},
    },
};

#[async_trait::async_trait]
pub trait BidRepository {
    /// Fails with a conflict when the company already has a pending bid on the upload, and
    /// with not found once the upload is closed to bidding.
    async fn create(&self, bid: &InsertBid) -> Result<BidEntity, error::SystemError>;

    async fn find_by_id(&self, bid_id: &Uuid) -> Result<Option<BidEntity>, error::SystemError>;

    async fn find_detail_by_id(
        &self,
        bid_id: &Uuid,
    ) -> Result<Option<BidDetail>, error::SystemError>;

    async fn find_pending_by_upload_and_company(
        &self,
        upload_id: &Uuid,
        company_id: &Uuid,
    ) -> Result<Option<BidEntity>, error::SystemError>;

    /// Newest first.
    async fn list_by_upload(&self, upload_id: &Uuid) -> Result<Vec<BidDetail>, error::SystemError>;

    /// Newest first.
    async fn list_by_company(
        &self,
        company_id: &Uuid,
    ) -> Result<Vec<BidDetail>, error::SystemError>;

    /// Moves a pending bid to `status`. Not found if missing, invalid transition if terminal.
    async fn update_status(
        &self,
        bid_id: &Uuid,
        status: BidStatus,
    ) -> Result<BidEntity, error::SystemError>;

    async fn reject_pending_for_upload(
        &self,
        upload_id: &Uuid,
    ) -> Result<Vec<BidEntity>, error::SystemError>;

    /// Flags an accepted, unpaid bid as paid. `None` when no such bid matches.
    async fn mark_paid(
        &self,
        bid_id: &Uuid,
        transaction_id: &str,
    ) -> Result<Option<BidEntity>, error::SystemError>;

    /// Expires every pending bid past its deadline. Returns how many changed.
    async fn expire_overdue(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError>;
}

#[async_trait::async_trait]
pub trait BidRepo: BidRepository + Send + Sync {
    /// All-or-nothing: closes the upload to bidding, accepts `bid_id` and rejects every other
    /// pending bid on the upload. Fails with an invalid transition if the bid is no longer
    /// pending or the upload already closed.
    async fn accept_bid_atomic(
        &self,
        bid_id: &Uuid,
        upload_id: &Uuid,
    ) -> Result<AcceptOutcome, error::SystemError>;

    /// All-or-nothing: closes the upload without a winner and rejects its pending bids.
    /// Repeatable on an already withdrawn upload. Fails with an invalid transition once a bid
    /// has been accepted, and with not found when the upload is missing.
    async fn withdraw_upload_atomic(
        &self,
        upload_id: &Uuid,
    ) -> Result<WithdrawOutcome, error::SystemError>;
}
