//! FCM HTTP v1 client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use pickup_common::auth::TokenSource;
use pickup_common::error::ProviderError;

use crate::{NotificationRequest, PushProvider, ProviderReceipt};

const FCM_ERROR_TYPE: &str = "type.googleapis.com/google.firebase.fcm.v1.FcmError";

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<Value>,
}

impl ErrorBody {
    /// FCM puts its own, more specific code (e.g. `UNREGISTERED`) in an `FcmError` detail.
    fn fcm_error_code(&self) -> Option<&str> {
        self.details
            .iter()
            .find(|d| d.get("@type").and_then(Value::as_str) == Some(FCM_ERROR_TYPE))
            .and_then(|d| d.get("errorCode"))
            .and_then(Value::as_str)
    }
}

/// Build the v1 `messages:send` payload for a notification.
pub fn message_body(request: &NotificationRequest) -> Value {
    json!({
        "message": {
            "token": request.token,
            "notification": {
                "title": request.title,
                "body": request.body,
            }
        }
    })
}

/// Sends notifications through Firebase Cloud Messaging.
#[derive(Clone)]
pub struct FcmClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenSource>,
}

impl FcmClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        project_id: &str,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let endpoint = format!(
            "{}/v1/projects/{}/messages:send",
            base_url.trim_end_matches('/'),
            project_id
        );
        Self {
            http,
            endpoint,
            tokens,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn error_from(response: reqwest::Response) -> ProviderError {
        let code = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => {
                let status = envelope
                    .error
                    .fcm_error_code()
                    .unwrap_or(&envelope.error.status)
                    .to_string();
                ProviderError::new(envelope.error.code.or(Some(code)), status, envelope.error.message)
            }
            Err(_) => ProviderError::new(Some(code), "UNKNOWN", text),
        }
    }
}

#[async_trait]
impl PushProvider for FcmClient {
    async fn send(&self, request: &NotificationRequest) -> Result<ProviderReceipt, ProviderError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&message_body(request))
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(None, "INTERNAL", e.to_string()))?;

        Ok(ProviderReceipt(sent.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickup_common::auth::StaticTokenSource;

    #[test]
    fn test_message_body() {
        let body = message_body(&NotificationRequest::new("tok-2", "Hi", "Bye"));
        assert_eq!(
            body,
            json!({
                "message": {
                    "token": "tok-2",
                    "notification": { "title": "Hi", "body": "Bye" }
                }
            })
        );
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = FcmClient::new(
            reqwest::Client::new(),
            "https://fcm.googleapis.com/",
            "pickup-test",
            Arc::new(StaticTokenSource::new("t")),
        );
        assert_eq!(
            client.endpoint(),
            "https://fcm.googleapis.com/v1/projects/pickup-test/messages:send"
        );
    }

    #[test]
    fn test_fcm_error_code_preferred() {
        let body: ErrorBody = serde_json::from_value(json!({
            "code": 404,
            "message": "Requested entity was not found.",
            "status": "NOT_FOUND",
            "details": [{ "@type": FCM_ERROR_TYPE, "errorCode": "UNREGISTERED" }]
        }))
        .unwrap();
        assert_eq!(body.fcm_error_code(), Some("UNREGISTERED"));
    }
}
