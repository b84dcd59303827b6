use async_trait::async_trait;
use serde_json::{json, Value};

use super::{StorageBackend, WriteError, WriteReceipt};

/// Backend-as-a-service client speaking the PostgREST-style table API.
/// Constructed once per process; the underlying HTTP client is shared
/// across requests.
pub struct ManagedBackend {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

/// One managed insert, normalized. The service's response shape varies by
/// client/server version, so extraction is defensive and centralized here.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Success { records: Option<Value> },
    Failure { message: String },
}

impl ManagedBackend {
    pub fn new(url: &str, service_key: &str) -> Result<Self, String> {
        let parsed = reqwest::Url::parse(url).map_err(|e| format!("invalid service URL: {e}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(format!("unsupported service URL scheme: {}", parsed.scheme()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }
}

#[async_trait]
impl StorageBackend for ManagedBackend {
    fn name(&self) -> &'static str {
        "managed"
    }

    async fn write(&self, payload: &Value) -> Result<WriteReceipt, WriteError> {
        let resp = self
            .client
            .post(format!("{}/rest/v1/submissions", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(&json!({ "data": payload }))
            .send()
            .await
            .map_err(|e| WriteError(format!("managed insert failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        match normalize_response(status, &body) {
            InsertOutcome::Success { records } => Ok(WriteReceipt::Remote { records }),
            InsertOutcome::Failure { message } => Err(WriteError(message)),
        }
    }
}

/// Map a raw (status, body) pair from the managed service onto a tagged
/// outcome.
///
/// Rules, in order: an explicit truthy `error` field is always a failure; a
/// non-2xx status is a failure with the best message available; a JSON array
/// or an object's `data` field are the inserted records; anything else on a
/// 2xx status is a success with no records, because the absence of an
/// explicit error on a successful status is not treated as a failure.
pub fn normalize_response(status: u16, body: &str) -> InsertOutcome {
    let ok = (200..300).contains(&status);
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(obj) = parsed.as_ref().and_then(Value::as_object) {
        if let Some(err) = obj.get("error").filter(|e| is_truthy(e)) {
            return InsertOutcome::Failure {
                message: stringify(err),
            };
        }
        if !ok {
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("managed service returned status {status}"));
            return InsertOutcome::Failure { message };
        }
        if let Some(data) = obj.get("data") {
            return InsertOutcome::Success {
                records: Some(data.clone()),
            };
        }
        return InsertOutcome::Success { records: None };
    }

    if !ok {
        let snippet: String = body.chars().take(256).collect();
        return InsertOutcome::Failure {
            message: format!("managed service returned status {status}: {snippet}"),
        };
    }

    match parsed {
        Some(records @ Value::Array(_)) => InsertOutcome::Success {
            records: Some(records),
        },
        _ => InsertOutcome::Success { records: None },
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn stringify(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
