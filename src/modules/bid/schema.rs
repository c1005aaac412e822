use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

/// `pending` is the only non-terminal state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "bid_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
    #[serde(alias = "declined")]
    Rejected,
    Expired,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
            BidStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BidStatus::Pending)
    }

    pub fn can_transition_to(&self, next: BidStatus) -> bool {
        *self == BidStatus::Pending && next.is_terminal()
    }

    /// Statuses an upload owner may request.
    pub fn is_owner_decision(&self) -> bool {
        matches!(self, BidStatus::Accepted | BidStatus::Rejected)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BidEntity {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub company_id: Uuid,
    pub amount: Decimal,
    pub message: Option<String>,
    pub status: BidStatus,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_paid: bool,
    pub payment_transaction_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl BidEntity {
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now > self.expires_at
    }
}

/// A bid joined with its company and upload display fields.
#[derive(Debug, Clone, FromRow)]
pub struct BidDetail {
    #[sqlx(flatten)]
    pub bid: BidEntity,
    pub company_name: String,
    pub upload_owner_id: Uuid,
    pub upload_title: String,
}
