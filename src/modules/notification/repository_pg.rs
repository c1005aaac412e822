use crate::{
    api::error,
    modules::notification::{model::Recipient, repository::DeviceTokenRepository},
};

#[derive(Clone)]
pub struct DeviceTokenRepositoryPg {
    pool: sqlx::PgPool,
}

impl DeviceTokenRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DeviceTokenRepository for DeviceTokenRepositoryPg {
    async fn find_token(
        &self,
        recipient: &Recipient,
    ) -> Result<Option<String>, error::SystemError> {
        let (sql, id) = match recipient {
            Recipient::User(id) => ("SELECT fcm_token FROM users WHERE id = $1", id),
            Recipient::Company(id) => ("SELECT fcm_token FROM companies WHERE id = $1", id),
        };

        let token: Option<Option<String>> =
            sqlx::query_scalar(sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(token.flatten())
    }

    async fn save_token(
        &self,
        recipient: &Recipient,
        token: &str,
    ) -> Result<bool, error::SystemError> {
        let (sql, id) = match recipient {
            Recipient::User(id) => {
                ("UPDATE users SET fcm_token = $2, updated_at = NOW() WHERE id = $1", id)
            }
            Recipient::Company(id) => {
                ("UPDATE companies SET fcm_token = $2, updated_at = NOW() WHERE id = $1", id)
            }
        };

        let rows =
            sqlx::query(sql).bind(id).bind(token).execute(&self.pool).await?.rows_affected();

        Ok(rows > 0)
    }
}
