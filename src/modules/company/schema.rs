use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Type, Serialize, Deserialize)]
#[sqlx(type_name = "company_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Press,
    Media,
    NewsAgency,
    Broadcast,
    DigitalMedia,
    #[default]
    Other,
}

#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct CompanyEntity {
    pub id: Uuid,
    pub company_name: String,
    pub company_email: String,
    pub hash_password: String,
    pub phone_number: String,
    pub company_address: String,
    pub company_website: Option<String>,
    pub business_license: String,
    pub company_type: CompanyType,
    pub is_verified: bool,
    pub is_active: bool,
    pub fcm_token: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
