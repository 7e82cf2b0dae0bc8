//! Direct notification route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use pickup_common::error::AppError;
use pickup_notifier::{NotificationRequest, ProviderReceipt};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/notifyVolunteer", post(notify_volunteer))
}

/// Request body for a direct notification. Every field may be omitted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NotifyRequest {
    pub token: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NotifyRequest {
    /// Read the request leniently: a body that is absent, not JSON, or not an
    /// object yields an empty request, so the token check decides the response.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Self {
        if !is_json(headers) {
            return Self::default();
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self {
                token: field_text(fields.get("token")),
                title: field_text(fields.get("title")),
                body: field_text(fields.get("body")),
            },
            _ => Self::default(),
        }
    }
}

/// `application/json` and `application/*+json`, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Falsy values (`null`, `false`, `0`, `""`) count as absent; any other
/// non-string value is forwarded in its JSON text form.
fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Response for an accepted notification.
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub success: bool,
    /// Provider message id
    pub response: ProviderReceipt,
}

/// POST /notifyVolunteer — Forward a notification to the push provider.
async fn notify_volunteer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NotifyResponse>, AppError> {
    let req = NotifyRequest::from_body(&headers, &body);

    let token = req
        .token
        .ok_or_else(|| AppError::Validation("Missing token".to_string()))?;

    let request = NotificationRequest::new(
        token,
        req.title.unwrap_or_default(),
        req.body.unwrap_or_default(),
    );

    let receipt = state.dispatcher.send(&request).await?;

    Ok(Json(NotifyResponse {
        success: true,
        response: receipt,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    fn parse(body: Value) -> NotifyRequest {
        NotifyRequest::from_body(&json_headers("application/json"), body.to_string().as_bytes())
    }

    #[test]
    fn test_full_request() {
        let req = parse(json!({"token": "tok", "title": "Hi", "body": "Bye"}));
        assert_eq!(req.token.as_deref(), Some("tok"));
        assert_eq!(req.title.as_deref(), Some("Hi"));
        assert_eq!(req.body.as_deref(), Some("Bye"));
    }

    #[test]
    fn test_falsy_tokens_are_absent() {
        for token in [json!(null), json!(false), json!(0), json!("")] {
            assert_eq!(parse(json!({ "token": token })).token, None);
        }
    }

    #[test]
    fn test_non_string_token_forwarded_as_text() {
        assert_eq!(parse(json!({"token": 12345})).token.as_deref(), Some("12345"));
    }

    #[test]
    fn test_unreadable_bodies_are_empty() {
        let headers = json_headers("application/json");
        assert_eq!(NotifyRequest::from_body(&headers, b""), NotifyRequest::default());
        assert_eq!(NotifyRequest::from_body(&headers, b"{not json"), NotifyRequest::default());
        assert_eq!(NotifyRequest::from_body(&headers, b"[1, 2]"), NotifyRequest::default());
    }

    #[test]
    fn test_content_type_required() {
        let body = br#"{"token":"tok"}"#;
        assert_eq!(NotifyRequest::from_body(&HeaderMap::new(), body), NotifyRequest::default());
        assert_eq!(
            NotifyRequest::from_body(&json_headers("text/plain"), body),
            NotifyRequest::default()
        );
        assert_eq!(
            NotifyRequest::from_body(&json_headers("application/json; charset=utf-8"), body)
                .token
                .as_deref(),
            Some("tok")
        );
        assert_eq!(
            NotifyRequest::from_body(&json_headers("application/merge-patch+json"), body)
                .token
                .as_deref(),
            Some("tok")
        );
    }
}
