use std::{sync::Arc, time::Duration};

use tokio::time::interval;

use crate::modules::{
    bid::repository::BidRepo, bidding::service::BiddingService,
    company::repository::CompanyRepository, upload::repository::UploadRepository,
};

/// Periodically expires overdue pending bids. Lazy expiry on access still applies without it.
pub struct ExpirySweeper<B, U, C>
where
    B: BidRepo,
    U: UploadRepository + Send + Sync,
    C: CompanyRepository + Send + Sync,
{
    service: BiddingService<B, U, C>,
    every: Duration,
}

impl<B, U, C> ExpirySweeper<B, U, C>
where
    B: BidRepo + 'static,
    U: UploadRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    pub fn new(service: BiddingService<B, U, C>, every: Duration) -> Self {
        Self { service, every }
    }

    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.every);
            tracing::info!(every_secs = self.every.as_secs(), "Bid expiry sweeper started");

            loop {
                sweep_interval.tick().await;

                match self.service.sweep_expired().await {
                    Ok(0) => tracing::debug!("No overdue bids"),
                    Ok(expired) => tracing::info!(expired, "Expired overdue bids"),
                    Err(e) => tracing::error!(error = %e, "Bid expiry sweep failed"),
                }
            }
        })
    }
}
