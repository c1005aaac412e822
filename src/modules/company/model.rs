use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::company::schema::{CompanyEntity, CompanyType};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyModel {
    #[validate(length(min = 1, max = 255, message = "Company name cannot be empty"))]
    pub company_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub company_email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(min = 8, max = 16, message = "Please enter a valid phone number"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Company address cannot be empty"))]
    pub company_address: String,
    #[validate(url(message = "Please enter a valid website URL"))]
    pub company_website: Option<String>,
    #[validate(length(min = 1, message = "Business license cannot be empty"))]
    pub business_license: String,
    #[serde(default)]
    pub company_type: CompanyType,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanySignInModel {
    #[validate(email(message = "Invalid email format"))]
    pub company_email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

pub struct InsertCompany {
    pub company_name: String,
    pub company_email: String,
    pub hash_password: String,
    pub phone_number: String,
    pub company_address: String,
    pub company_website: Option<String>,
    pub business_license: String,
    pub company_type: CompanyType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub company_name: String,
    pub company_email: String,
    pub phone_number: String,
    pub company_address: String,
    pub company_website: Option<String>,
    pub company_type: CompanyType,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CompanyEntity> for CompanyResponse {
    fn from(entity: CompanyEntity) -> Self {
        CompanyResponse {
            id: entity.id,
            company_name: entity.company_name,
            company_email: entity.company_email,
            phone_number: entity.phone_number,
            company_address: entity.company_address,
            company_website: entity.company_website,
            company_type: entity.company_type,
            is_verified: entity.is_verified,
            created_at: entity.created_at,
        }
    }
}
