use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::schema::UserRole;

/// Who a notification is addressed to. Users and companies live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    User(Uuid),
    Company(Uuid),
}

impl Recipient {
    pub fn from_principal(id: Uuid, role: &UserRole) -> Self {
        match role {
            UserRole::Company => Recipient::Company(id),
            UserRole::User | UserRole::Admin => Recipient::User(id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub title: String,
    pub body: String,
    pub metadata: HashMap<String, String>,
}

impl Notification {
    pub fn new(recipient: Recipient, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { recipient, title: title.into(), body: body.into(), metadata: HashMap::new() }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTokenBody {
    #[validate(length(min = 1, max = 4096, message = "Device token cannot be empty"))]
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatus {
    pub gateway: &'static str,
    pub push_enabled: bool,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}
