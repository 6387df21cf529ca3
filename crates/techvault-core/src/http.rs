//! Transport abstraction between the API client and the network.
//!
//! The client never talks to an HTTP library directly. It builds
//! [`HttpRequest`] values and hands them to a [`Transport`], which makes
//! the refresh policy testable without a server.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::error::{VaultError, VaultResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path beginning with `/api/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token, filled in by the client right before sending.
    pub bearer: Option<String>,
    /// Correlation id shared by the original send and its replay.
    pub request_id: Uuid,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// A response as seen by the client: status, raw body, content type.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".into()),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON. Empty bodies decode to `null`.
    pub fn json_body(&self) -> VaultResult<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| VaultError::Decode(e.to_string()))
    }

    /// Map a non-2xx response onto the error taxonomy, keeping the
    /// server-provided message where there is one.
    pub fn into_error(self) -> VaultError {
        let payload = serde_json::from_slice::<Value>(&self.body).unwrap_or(Value::Null);
        let fields = field_errors(&payload);
        let message = server_message(&payload, &fields)
            .unwrap_or_else(|| fallback_message(self.status).to_string());

        match self.status {
            401 => VaultError::AuthenticationFailed { reason: message },
            403 => VaultError::PermissionDenied { reason: message },
            404 => VaultError::NotFoundMessage { message },
            409 => VaultError::Conflict { message },
            400..=499 => VaultError::Validation { message, fields },
            status => VaultError::Server { status, message },
        }
    }
}

/// The seam between the client and the network.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = VaultResult<HttpResponse>> + Send;
}

const MESSAGE_KEYS: [&str; 3] = ["detail", "message", "error"];

fn server_message(payload: &Value, fields: &BTreeMap<String, Vec<String>>) -> Option<String> {
    match payload {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        Value::Object(map) => {
            for key in MESSAGE_KEYS {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
            if let Some(first) = fields.get("non_field_errors").and_then(|v| v.first()) {
                return Some(first.clone());
            }
            fields
                .iter()
                .find_map(|(field, msgs)| msgs.first().map(|m| format!("{field}: {m}")))
        }
        _ => None,
    }
}

fn field_errors(payload: &Value) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    let Value::Object(map) = payload else {
        return fields;
    };
    for (key, value) in map {
        if MESSAGE_KEYS.contains(&key.as_str()) {
            continue;
        }
        let messages: Vec<String> = match value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        if !messages.is_empty() {
            fields.insert(key.clone(), messages);
        }
    }
    fields
}

fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "The request was invalid",
        401 => "Authentication required",
        403 => "You do not have permission to perform this action",
        404 => "The requested resource was not found",
        409 => "The resource was modified concurrently",
        500..=599 => "The server encountered an error",
        _ => "Request failed",
    }
}
