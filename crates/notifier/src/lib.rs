//! Push-notification delivery.
//!
//! `Dispatcher` is the single entry point for sending a notification. It wraps any
//! `PushProvider`; production uses `FcmClient` (FCM HTTP v1), tests plug in fakes.

pub mod dispatcher;
pub mod fcm;

use async_trait::async_trait;

use pickup_common::error::ProviderError;
pub use pickup_common::types::{NotificationRequest, ProviderReceipt};

pub use dispatcher::Dispatcher;
pub use fcm::FcmClient;

/// A service able to deliver a notification to one device.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, request: &NotificationRequest) -> Result<ProviderReceipt, ProviderError>;
}
