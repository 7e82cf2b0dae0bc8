//! Firestore REST v1 client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{Document, DocumentStore};
use crate::auth::TokenSource;
use crate::error::StoreError;

/// A document as returned by the REST API, fields still in typed-value form.
#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// One row of a `runQuery` response. Rows without a document only carry a read time.
#[derive(Debug, Deserialize)]
struct QueryRow {
    document: Option<RawDocument>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, StoreError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::Decode(format!("malformed document name '{}'", self.name)))?
            .to_string();

        let fields = self
            .fields
            .iter()
            .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
            .collect::<Result<Map<_, _>, _>>()?;

        Ok(Document::new(id, fields))
    }
}

/// Convert a Firestore typed value (`{"stringValue": "x"}`) into plain JSON.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("expected typed value, got {}", value)))?;

    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty typed value".to_string()))?;

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" => inner.clone(),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        // 64-bit integers travel as strings
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| StoreError::Decode(format!("bad integerValue '{}'", s)))?,
            other => other.clone(),
        },
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|m| {
                    m.iter()
                        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
                        .collect::<Result<Map<_, _>, _>>()
                })
                .transpose()?
                .unwrap_or_default();
            Value::Object(fields)
        }
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|a| a.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Value::Array(values)
        }
        other => return Err(StoreError::Decode(format!("unsupported value type '{}'", other))),
    };

    Ok(decoded)
}

/// Convert plain JSON into a Firestore typed value for use in query filters.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Document store backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    database: String,
    tokens: Arc<dyn TokenSource>,
}

impl FirestoreClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        project_id: impl Into<String>,
        database: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Decode(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            project_id: project_id.into(),
            database: database.into(),
            tokens,
        })
    }

    /// `{base}/v1/projects/{project}/databases/{db}/documents/...`
    fn documents_url(&self, tail: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Decode(format!("base URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["v1", "projects", self.project_id.as_str(), "databases", self.database.as_str()])
            .extend(tail);
        Ok(url)
    }

    async fn error_from(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StoreError::Status { status, body }
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.documents_url(&["documents", collection, id])?;
        let token = self.tokens.access_token().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let raw: RawDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        raw.into_document().map(Some)
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let url = self.documents_url(&["documents:runQuery"])?;
        let token = self.tokens.access_token().await?;

        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": encode_value(value),
                    }
                },
                "limit": limit,
            }
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let rows: Vec<QueryRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        rows.into_iter()
            .filter_map(|row| row.document)
            .map(RawDocument::into_document)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({"stringValue": "alice"})).unwrap(), json!("alice"));
        assert_eq!(decode_value(&json!({"integerValue": "42"})).unwrap(), json!(42));
        assert_eq!(decode_value(&json!({"booleanValue": true})).unwrap(), json!(true));
        assert_eq!(decode_value(&json!({"nullValue": null})).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_nested() {
        let typed = json!({
            "mapValue": {
                "fields": {
                    "tags": { "arrayValue": { "values": [{ "stringValue": "a" }] } },
                    "empty": { "arrayValue": {} }
                }
            }
        });
        assert_eq!(decode_value(&typed).unwrap(), json!({"tags": ["a"], "empty": []}));
    }

    #[test]
    fn test_decode_unknown_type() {
        assert!(decode_value(&json!({"weirdValue": 1})).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn test_encode_query_values() {
        assert_eq!(encode_value(&json!("alice")), json!({"stringValue": "alice"}));
        assert_eq!(encode_value(&json!(7)), json!({"integerValue": "7"}));
        assert_eq!(encode_value(&json!(1.5)), json!({"doubleValue": 1.5}));
    }

    #[test]
    fn test_document_id_from_name() {
        let raw = RawDocument {
            name: "projects/p/databases/(default)/documents/users/u-42".to_string(),
            fields: Map::new(),
        };
        assert_eq!(raw.into_document().unwrap().id, "u-42");
    }

    #[test]
    fn test_documents_url() {
        let client = FirestoreClient::new(
            reqwest::Client::new(),
            "https://firestore.googleapis.com",
            "pickup-test",
            "(default)",
            Arc::new(StaticTokenSource::new("t")),
        )
        .unwrap();
        let url = client.documents_url(&["documents", "deliveries", "D1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/pickup-test/databases/(default)/documents/deliveries/D1"
        );
    }
}
