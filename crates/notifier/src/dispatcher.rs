//! Notification dispatcher.

use std::sync::Arc;

use pickup_common::error::ProviderError;

use crate::{NotificationRequest, ProviderReceipt, PushProvider};

/// Hands notifications to a push provider. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn PushProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn PushProvider>) -> Self {
        Self { provider }
    }

    /// Send one notification. Failures are logged and returned to the caller.
    pub async fn send(&self, request: &NotificationRequest) -> Result<ProviderReceipt, ProviderError> {
        match self.provider.send(request).await {
            Ok(receipt) => {
                tracing::info!(message_id = %receipt, title = %request.title, "Notification sent");
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    code = ?e.code,
                    title = %request.title,
                    "Error sending notification"
                );
                Err(e)
            }
        }
    }

    /// Send one notification, absorbing any failure after logging it.
    pub async fn send_and_forget(&self, request: &NotificationRequest) -> Option<ProviderReceipt> {
        self.send(request).await.ok()
    }
}
