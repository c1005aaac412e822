use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

/// Upload lifecycle. Only moves forward:
/// `pending -> bid_received -> accepted -> completed`, with `rejected` reachable from the first two.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "upload_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    BidReceived,
    Accepted,
    Rejected,
    Completed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::BidReceived => "bid_received",
            UploadStatus::Accepted => "accepted",
            UploadStatus::Rejected => "rejected",
            UploadStatus::Completed => "completed",
        }
    }

    /// States from which `self` may be entered.
    pub fn predecessors(&self) -> &'static [UploadStatus] {
        match self {
            UploadStatus::Pending => &[],
            UploadStatus::BidReceived => &[UploadStatus::Pending],
            UploadStatus::Accepted | UploadStatus::Rejected => {
                &[UploadStatus::Pending, UploadStatus::BidReceived]
            }
            UploadStatus::Completed => &[UploadStatus::Accepted],
        }
    }

    pub fn can_advance_to(&self, next: UploadStatus) -> bool {
        next.predecessors().contains(self)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub file_url: String,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub file_type: FileType,
    pub file_size: i64,
    pub watermarked_preview_url: Option<String>,
    pub is_available_for_bidding: bool,
    pub status: UploadStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::UploadStatus::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(Pending.can_advance_to(BidReceived));
        assert!(BidReceived.can_advance_to(Accepted));
        assert!(Pending.can_advance_to(Accepted));
        assert!(Accepted.can_advance_to(Completed));

        assert!(!BidReceived.can_advance_to(Pending));
        assert!(!Accepted.can_advance_to(BidReceived));
        assert!(!Accepted.can_advance_to(Rejected));
        assert!(!Completed.can_advance_to(Accepted));
        assert!(!Rejected.can_advance_to(Completed));
    }

    #[test]
    fn same_status_is_not_an_advance() {
        for status in [Pending, BidReceived, Accepted, Rejected, Completed] {
            assert!(!status.can_advance_to(status));
        }
    }
}
