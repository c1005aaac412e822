use std::sync::Arc;

use serde_json::json;

use crate::modules::notification::{model::Notification, repository::DeviceTokenRepository};

/// Delivery boundary. Returns whether the gateway accepted the notification; callers treat
/// the result as informational only.
#[async_trait::async_trait]
pub trait NotificationDispatcher {
    async fn notify(&self, notification: &Notification) -> bool;

    fn name(&self) -> &'static str;

    fn is_push_enabled(&self) -> bool {
        false
    }
}

/// Used when no push gateway is configured.
#[derive(Debug, Default, Clone)]
pub struct LogDispatcher;

#[async_trait::async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn notify(&self, notification: &Notification) -> bool {
        tracing::info!(
            recipient = ?notification.recipient,
            title = %notification.title,
            "Notification (push disabled): {}",
            notification.body
        );
        true
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

pub struct PushGatewayDispatcher {
    client: reqwest::Client,
    gateway_url: String,
    api_key: Option<String>,
    tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
}

impl PushGatewayDispatcher {
    pub fn new(
        gateway_url: String,
        api_key: Option<String>,
        tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, gateway_url, api_key, tokens }
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for PushGatewayDispatcher {
    async fn notify(&self, notification: &Notification) -> bool {
        let token = match self.tokens.find_token(&notification.recipient).await {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                tracing::warn!(recipient = ?notification.recipient, "No device token, skipping notification");
                return false;
            }
            Err(e) => {
                tracing::error!(recipient = ?notification.recipient, "Device token lookup failed: {e}");
                return false;
            }
        };

        let payload = json!({
            "token": token,
            "notification": { "title": notification.title, "body": notification.body },
            "data": notification.metadata,
        });

        let mut request = self.client.post(&self.gateway_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(res) if res.status().is_success() => {
                tracing::debug!(recipient = ?notification.recipient, "Notification delivered");
                true
            }
            Ok(res) => {
                tracing::warn!(
                    recipient = ?notification.recipient,
                    status = %res.status(),
                    "Push gateway refused notification"
                );
                false
            }
            Err(e) => {
                tracing::error!(recipient = ?notification.recipient, "Push gateway unreachable: {e}");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "push-gateway"
    }

    fn is_push_enabled(&self) -> bool {
        true
    }
}
