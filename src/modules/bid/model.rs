use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::error;

/// Largest amount that fits `NUMERIC(10, 2)`.
/// 9_999_999_999 at scale 2, split into the low and mid 32-bit words.
pub const MAX_BID_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Rounds to cents, then checks `0 < amount <= MAX_BID_AMOUNT`.
pub fn normalize_amount(amount: Decimal) -> Result<Decimal, &'static str> {
    let amount = amount.round_dp(2);
    if amount <= Decimal::ZERO {
        return Err("Bid amount must be greater than zero");
    }
    if amount > MAX_BID_AMOUNT {
        return Err("Bid amount must not exceed 99999999.99");
    }
    Ok(amount)
}

/// A validated bid ready to be persisted. Only constructible with an amount of at least one
/// cent that fits the amount column.
#[derive(Debug, Clone)]
pub struct InsertBid {
    pub upload_id: Uuid,
    pub company_id: Uuid,
    pub amount: Decimal,
    pub message: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl InsertBid {
    pub fn new(
        upload_id: Uuid,
        company_id: Uuid,
        amount: Decimal,
        message: Option<String>,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Self, error::SystemError> {
        let amount = normalize_amount(amount).map_err(error::SystemError::bad_request)?;

        Ok(Self {
            upload_id,
            company_id,
            amount,
            message: message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            expires_at,
        })
    }
}

/// Result of accepting a bid: the winner and every sibling rejected by the cascade.
#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub accepted: super::schema::BidEntity,
    pub rejected: Vec<super::schema::BidEntity>,
}

/// Result of withdrawing an upload: the closed upload and the pending bids it rejected.
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    pub upload: crate::modules::upload::schema::UploadEntity,
    pub rejected: Vec<super::schema::BidEntity>,
}
