use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::RedisCache;
use crate::modules::company::{
    model::{CompanyResponse, CompanySignInModel, InsertCompany, RegisterCompanyModel},
    repository::CompanyRepository,
};
use crate::modules::user::{schema::UserRole, service::token_settings};
use crate::utils::{hash_password, issue_token_pair, verify_password};

#[derive(Clone)]
pub struct CompanyService {
    repo: Arc<dyn CompanyRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl CompanyService {
    pub fn with_dependencies(
        repo: Arc<dyn CompanyRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        log::info!("CompanyService initialized with dependencies");
        CompanyService { repo, cache }
    }

    /// Uniqueness of name, email, phone and license is enforced by the schema and surfaces as a
    /// conflict naming the column.
    pub async fn register(
        &self,
        company: RegisterCompanyModel,
    ) -> Result<CompanyResponse, error::SystemError> {
        let hash_password = hash_password(&company.password)?;

        let entity = self
            .repo
            .create(&InsertCompany {
                company_name: company.company_name,
                company_email: company.company_email,
                hash_password,
                phone_number: company.phone_number,
                company_address: company.company_address,
                company_website: company.company_website,
                business_license: company.business_license,
                company_type: company.company_type,
            })
            .await?;

        log::info!("Company {} registered", entity.id);
        Ok(CompanyResponse::from(entity))
    }

    pub async fn sign_in(
        &self,
        credentials: CompanySignInModel,
    ) -> Result<(String, String), error::SystemError> {
        let company = self
            .repo
            .find_by_email(&credentials.company_email)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid credentials"))?;

        if !company.is_active {
            return Err(error::SystemError::unauthorized("Company account is deactivated"));
        }

        if !verify_password(&company.hash_password, &credentials.password)? {
            return Err(error::SystemError::unauthorized("Invalid credentials"));
        }

        issue_token_pair(&self.cache, token_settings(), &company.id, &UserRole::Company).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CompanyResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(CompanyResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Company not found"))
    }
}
