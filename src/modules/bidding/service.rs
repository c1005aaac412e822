use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        bid::{
            model::InsertBid,
            repository::BidRepo,
            schema::{BidEntity, BidStatus},
        },
        bidding::model::{BidView, BiddingConfig},
        company::repository::CompanyRepository,
        notification::{
            dispatcher::NotificationDispatcher,
            model::{Notification, Recipient},
        },
        upload::{
            model::UploadSummary,
            repository::UploadRepository,
            schema::{FileType, UploadEntity, UploadStatus},
        },
    },
};

/// Owns the bid lifecycle: placement, owner decisions with the acceptance cascade, lazy
/// expiry, withdrawal and payment. Notifications never affect the committed outcome.
#[derive(Clone)]
pub struct BiddingService<B, U, C>
where
    B: BidRepo,
    U: UploadRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
{
    bid_repo: Arc<B>,
    upload_repo: Arc<U>,
    company_repo: Arc<C>,
    dispatcher: Arc<dyn NotificationDispatcher + Send + Sync>,
    config: BiddingConfig,
}

impl<B, U, C> BiddingService<B, U, C>
where
    B: BidRepo,
    U: UploadRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
{
    pub fn with_dependencies(
        bid_repo: Arc<B>,
        upload_repo: Arc<U>,
        company_repo: Arc<C>,
        dispatcher: Arc<dyn NotificationDispatcher + Send + Sync>,
        config: BiddingConfig,
    ) -> Self {
        BiddingService { bid_repo, upload_repo, company_repo, dispatcher, config }
    }

    pub async fn create_bid(
        &self,
        upload_id: Uuid,
        company_id: Uuid,
        amount: Decimal,
        message: Option<String>,
    ) -> Result<BidView, error::SystemError> {
        let now = chrono::Utc::now();
        let insert =
            InsertBid::new(upload_id, company_id, amount, message, now + self.config.bid_ttl)?;

        let upload = self
            .upload_repo
            .find_by_id(&upload_id)
            .await?
            .filter(|u| u.is_available_for_bidding)
            .ok_or_else(|| {
                error::SystemError::not_found("Upload not found or not available for bidding")
            })?;

        let company = self
            .company_repo
            .find_by_id(&company_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Company not found"))?;

        if let Some(existing) =
            self.bid_repo.find_pending_by_upload_and_company(&upload_id, &company_id).await?
        {
            // an overdue pending bid no longer blocks a fresh one
            if !existing.is_expired_at(now) {
                return Err(error::SystemError::conflict(
                    "You already have a pending bid for this upload",
                ));
            }
            self.expire(&existing).await?;
        }

        let bid = self.bid_repo.create(&insert).await?;
        self.upload_repo.set_status(&upload.id, UploadStatus::BidReceived).await?;

        log::info!("Bid {} placed on upload {} by company {}", bid.id, upload.id, company.id);

        self.dispatch(
            Notification::new(
                Recipient::User(upload.user_id),
                "New bid received",
                format!(
                    "{} placed a bid of ${} on \"{}\"",
                    company.company_name, bid.amount, upload.title
                ),
            )
            .with("type", "new_bid")
            .with("bidId", bid.id)
            .with("uploadId", upload.id),
        );

        Ok(BidView::new(bid, company.company_name))
    }

    pub async fn update_bid_status(
        &self,
        bid_id: Uuid,
        status: BidStatus,
        owner_id: Uuid,
    ) -> Result<BidView, error::SystemError> {
        let detail = self
            .bid_repo
            .find_detail_by_id(&bid_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Bid not found"))?;

        if detail.upload_owner_id != owner_id {
            return Err(error::SystemError::forbidden(
                "You can only manage bids on your own uploads",
            ));
        }

        if !status.is_owner_decision() {
            return Err(error::SystemError::bad_request("Status must be accepted or rejected"));
        }

        if !detail.bid.status.can_transition_to(status) {
            return Err(error::SystemError::invalid_transition(format!(
                "Bid has already been {}",
                detail.bid.status.as_str()
            )));
        }

        if detail.bid.is_expired_at(chrono::Utc::now()) {
            self.expire(&detail.bid).await?;
            return Err(error::SystemError::expired("Bid has expired"));
        }

        let upload_title = detail.upload_title;
        let company_name = detail.company_name;

        if status == BidStatus::Rejected {
            let bid = self.bid_repo.update_status(&bid_id, BidStatus::Rejected).await?;
            log::info!("Bid {} rejected by owner {}", bid.id, owner_id);
            self.notify_rejected(&bid, &upload_title);
            return Ok(BidView::new(bid, company_name));
        }

        let outcome = self.bid_repo.accept_bid_atomic(&bid_id, &detail.bid.upload_id).await?;
        log::info!(
            "Bid {} accepted on upload {}, {} sibling bid(s) rejected",
            outcome.accepted.id,
            outcome.accepted.upload_id,
            outcome.rejected.len()
        );

        self.dispatch(
            Notification::new(
                Recipient::Company(outcome.accepted.company_id),
                "Bid accepted",
                format!(
                    "Your bid of ${} on \"{}\" was accepted",
                    outcome.accepted.amount, upload_title
                ),
            )
            .with("type", "bid_accepted")
            .with("bidId", outcome.accepted.id)
            .with("uploadId", outcome.accepted.upload_id),
        );
        for sibling in &outcome.rejected {
            self.notify_rejected(sibling, &upload_title);
        }

        Ok(BidView::new(outcome.accepted, company_name))
    }

    pub async fn list_bids_for_upload(
        &self,
        upload_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<BidView>, error::SystemError> {
        self.upload_repo
            .find_owned(&upload_id, &owner_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Upload not found or access denied"))?;

        let bids = self.bid_repo.list_by_upload(&upload_id).await?;
        Ok(bids.into_iter().map(BidView::from).collect())
    }

    pub async fn list_bids_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<BidView>, error::SystemError> {
        let bids = self.bid_repo.list_by_company(&company_id).await?;
        Ok(bids.into_iter().map(BidView::from).collect())
    }

    pub async fn list_available_uploads(
        &self,
        file_type: Option<FileType>,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        self.upload_repo.find_available_for_bidding(file_type).await
    }

    /// Closes an upload to bidding without a winner. Safe to repeat.
    pub async fn withdraw_upload(
        &self,
        upload_id: Uuid,
        owner_id: Uuid,
    ) -> Result<UploadEntity, error::SystemError> {
        let upload = self
            .upload_repo
            .find_owned(&upload_id, &owner_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Upload not found or access denied"))?;

        let outcome = self.bid_repo.withdraw_upload_atomic(&upload.id).await?;

        log::info!(
            "Upload {} withdrawn, {} pending bid(s) rejected",
            upload.id,
            outcome.rejected.len()
        );
        for bid in &outcome.rejected {
            self.notify_rejected(bid, &outcome.upload.title);
        }

        Ok(outcome.upload)
    }

    pub async fn record_payment(
        &self,
        bid_id: Uuid,
        company_id: Uuid,
        transaction_id: &str,
    ) -> Result<BidView, error::SystemError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(error::SystemError::bad_request("Transaction id cannot be empty"));
        }

        let detail = self
            .bid_repo
            .find_detail_by_id(&bid_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Bid not found"))?;

        if detail.bid.company_id != company_id {
            return Err(error::SystemError::forbidden("You can only pay for your own bids"));
        }

        if detail.bid.status != BidStatus::Accepted {
            return Err(error::SystemError::invalid_transition("Only accepted bids can be paid"));
        }

        if detail.bid.is_paid {
            return Err(error::SystemError::conflict("Bid has already been paid"));
        }

        let bid = self
            .bid_repo
            .mark_paid(&bid_id, transaction_id)
            .await?
            .ok_or_else(|| error::SystemError::conflict("Bid has already been paid"))?;

        self.upload_repo.set_status(&bid.upload_id, UploadStatus::Completed).await?;
        log::info!("Payment {} recorded for bid {}", transaction_id, bid.id);

        self.dispatch(
            Notification::new(
                Recipient::User(detail.upload_owner_id),
                "Payment received",
                format!(
                    "{} paid ${} for \"{}\"",
                    detail.company_name, bid.amount, detail.upload_title
                ),
            )
            .with("type", "payment_received")
            .with("bidId", bid.id)
            .with("uploadId", bid.upload_id),
        );

        Ok(BidView::new(bid, detail.company_name))
    }

    /// Bulk form of lazy expiry, run by the background sweeper.
    pub async fn sweep_expired(&self) -> Result<u64, error::SystemError> {
        let expired = self.bid_repo.expire_overdue(chrono::Utc::now()).await?;
        if expired > 0 {
            log::info!("Expired {} overdue bid(s)", expired);
        }
        Ok(expired)
    }

    async fn expire(&self, bid: &BidEntity) -> Result<(), error::SystemError> {
        self.bid_repo.update_status(&bid.id, BidStatus::Expired).await?;
        log::info!("Bid {} expired", bid.id);
        Ok(())
    }

    fn notify_rejected(&self, bid: &BidEntity, upload_title: &str) {
        self.dispatch(
            Notification::new(
                Recipient::Company(bid.company_id),
                "Bid not selected",
                format!("Your bid of ${} on \"{}\" was not selected", bid.amount, upload_title),
            )
            .with("type", "bid_rejected")
            .with("bidId", bid.id)
            .with("uploadId", bid.upload_id),
        );
    }

    fn dispatch(&self, notification: Notification) {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            if !dispatcher.notify(&notification).await {
                tracing::warn!(
                    recipient = ?notification.recipient,
                    title = %notification.title,
                    "Notification was not delivered"
                );
            }
        });
    }
}
