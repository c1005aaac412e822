use std::sync::Arc;

use crate::{
    api::error,
    modules::notification::{
        dispatcher::NotificationDispatcher,
        model::{NotificationStatus, Recipient},
        repository::DeviceTokenRepository,
    },
};

#[derive(Clone)]
pub struct NotificationService {
    tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
    dispatcher: Arc<dyn NotificationDispatcher + Send + Sync>,
}

impl NotificationService {
    pub fn with_dependencies(
        tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
        dispatcher: Arc<dyn NotificationDispatcher + Send + Sync>,
    ) -> Self {
        NotificationService { tokens, dispatcher }
    }

    pub async fn register_device_token(
        &self,
        recipient: Recipient,
        token: &str,
    ) -> Result<(), error::SystemError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(error::SystemError::bad_request("Device token cannot be empty"));
        }

        if !self.tokens.save_token(&recipient, token).await? {
            return Err(error::SystemError::not_found("Account not found"));
        }

        log::debug!("Device token registered for {:?}", recipient);
        Ok(())
    }

    pub fn status(&self) -> NotificationStatus {
        NotificationStatus {
            gateway: self.dispatcher.name(),
            push_enabled: self.dispatcher.is_push_enabled(),
            checked_at: chrono::Utc::now(),
        }
    }
}
