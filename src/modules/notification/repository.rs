use crate::{api::error, modules::notification::model::Recipient};

#[async_trait::async_trait]
pub trait DeviceTokenRepository {
    async fn find_token(&self, recipient: &Recipient)
        -> Result<Option<String>, error::SystemError>;

    /// Returns `false` when the recipient does not exist.
    async fn save_token(
        &self,
        recipient: &Recipient,
        token: &str,
    ) -> Result<bool, error::SystemError>;
}
