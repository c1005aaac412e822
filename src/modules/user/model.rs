use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::user::schema::UserEntity;

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return Ok(());
    }
    Err(ValidationError::new("username")
        .with_message("Username may only contain letters, digits, '_' and '.'".into()))
}

/// `+` followed by 8 to 15 digits, or the digits alone.
fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::new("phone_number").with_message("Please enter a valid phone number".into()))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCreatorModel {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(length(min = 6, max = 100, message = "Password must be 6-100 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 4096, message = "Device token cannot be empty"))]
    pub fcm_token: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSignInModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    /// Replaces the stored push token when it differs.
    #[validate(length(min = 1, max = 4096, message = "Device token cannot be empty"))]
    pub fcm_token: Option<String>,
}

pub struct InsertUser {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub hash_password: String,
    pub fcm_token: Option<String>,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for CreatorResponse {
    fn from(entity: UserEntity) -> Self {
        CreatorResponse {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            phone_number: entity.phone_number,
            created_at: entity.created_at,
        }
    }
}
