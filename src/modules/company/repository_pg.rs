use uuid::Uuid;

use crate::{
    api::error,
    modules::company::{
        model::InsertCompany, repository::CompanyRepository, schema::CompanyEntity,
    },
};

#[derive(Clone)]
pub struct CompanyRepositoryPg {
    pool: sqlx::PgPool,
}

impl CompanyRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CompanyRepository for CompanyRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CompanyEntity>, error::SystemError> {
        let company = sqlx::query_as::<_, CompanyEntity>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CompanyEntity>, error::SystemError> {
        let company = sqlx::query_as::<_, CompanyEntity>(
            "SELECT * FROM companies WHERE lower(company_email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn create(&self, company: &InsertCompany) -> Result<CompanyEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, CompanyEntity>(
            r#"
            INSERT INTO companies (
                id, company_name, company_email, hash_password, phone_number,
                company_address, company_website, business_license, company_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&company.company_name)
        .bind(&company.company_email)
        .bind(&company.hash_password)
        .bind(&company.phone_number)
        .bind(&company.company_address)
        .bind(&company.company_website)
        .bind(&company.business_license)
        .bind(company.company_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }
}
