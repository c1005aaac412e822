use uuid::Uuid;

use crate::{
    api::error,
    modules::company::{model::InsertCompany, schema::CompanyEntity},
};

#[async_trait::async_trait]
pub trait CompanyRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CompanyEntity>, error::SystemError>;

    async fn find_by_email(&self, email: &str)
        -> Result<Option<CompanyEntity>, error::SystemError>;

    async fn create(&self, company: &InsertCompany) -> Result<CompanyEntity, error::SystemError>;
}
