use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::bid::{
    model::normalize_amount,
    schema::{BidDetail, BidEntity, BidStatus},
};

fn validate_bid_amount(amount: &Decimal) -> Result<(), ValidationError> {
    normalize_amount(*amount)
        .map(|_| ())
        .map_err(|msg| ValidationError::new("bid_amount").with_message(msg.into()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidBody {
    pub upload_id: Uuid,
    #[validate(custom(function = "validate_bid_amount"))]
    pub amount: Decimal,
    #[validate(length(min = 10, max = 1000, message = "Message must be 10-1000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBidStatusBody {
    pub status: BidStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    #[validate(length(min = 1, max = 255, message = "Transaction id cannot be empty"))]
    pub transaction_id: String,
}

/// Bid as returned to both sides of the marketplace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub amount: Decimal,
    pub message: Option<String>,
    pub status: BidStatus,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_paid: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl BidView {
    pub fn new(bid: BidEntity, company_name: String) -> Self {
        BidView {
            id: bid.id,
            upload_id: bid.upload_id,
            company_id: bid.company_id,
            company_name,
            amount: bid.amount,
            message: bid.message,
            status: bid.status,
            expires_at: bid.expires_at,
            is_paid: bid.is_paid,
            created_at: bid.created_at,
            updated_at: bid.updated_at,
        }
    }
}

impl From<BidDetail> for BidView {
    fn from(detail: BidDetail) -> Self {
        BidView::new(detail.bid, detail.company_name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BiddingConfig {
    /// How long a pending bid stays actionable.
    pub bid_ttl: chrono::Duration,
}

impl BiddingConfig {
    pub fn with_ttl_days(days: i64) -> Self {
        Self { bid_ttl: chrono::Duration::days(days) }
    }
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self::with_ttl_days(7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_requires_positive_amount() {
        let body: CreateBidBody = serde_json::from_value(serde_json::json!({
            "uploadId": Uuid::now_v7(),
            "amount": 0,
        }))
        .unwrap();
        assert!(body.validate().is_err());

        let body: CreateBidBody = serde_json::from_value(serde_json::json!({
            "uploadId": Uuid::now_v7(),
            "amount": 49.99,
            "message": "Front page, this weekend",
        }))
        .unwrap();
        assert!(body.validate().is_ok());
    }

    #[test]
    fn create_body_amount_must_survive_rounding_and_fit() {
        for amount in [Decimal::new(4, 3), Decimal::new(100_000_000, 0)] {
            let body = CreateBidBody { upload_id: Uuid::now_v7(), amount, message: None };
            let errors = body.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"));
        }

        let body = CreateBidBody {
            upload_id: Uuid::now_v7(),
            amount: Decimal::new(9_999_999_999, 2),
            message: None,
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn short_message_is_refused() {
        let body = CreateBidBody {
            upload_id: Uuid::now_v7(),
            amount: Decimal::ONE_HUNDRED,
            message: Some("hi".into()),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn status_body_accepts_declined() {
        let body: UpdateBidStatusBody =
            serde_json::from_str(r#"{ "status": "declined" }"#).unwrap();
        assert_eq!(body.status, BidStatus::Rejected);
    }
}
