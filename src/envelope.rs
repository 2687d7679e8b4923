//! Result envelope exchanged across the worker process boundary.
//!
//! The worker writes exactly one [`WireEnvelope`] as JSON to stdout; the
//! executor parses it back into a typed [`ToolResponse`]. Structured (JSON)
//! results are carried as a JSON document encoded into the first content
//! item's `text` field and re-parsed on the way out.

use serde::{Deserialize, Serialize};

/// Typed result of a tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// Plain text result.
    Text(String),
    /// Structured JSON result.
    Json(serde_json::Value),
    /// Error described by a human-readable message.
    Error(String),
}

impl ToolResponse {
    /// Create a text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a structured JSON response.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Whether this response describes an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serialize into the wire envelope shape.
    pub fn to_wire(&self) -> WireEnvelope {
        match self {
            Self::Text(text) => WireEnvelope {
                is_error: false,
                content: vec![ContentItem::text(text.clone())],
            },
            Self::Json(value) => WireEnvelope {
                is_error: false,
                content: vec![ContentItem::text(
                    serde_json::to_string(value).unwrap_or_else(|_| String::from("null")),
                )],
            },
            Self::Error(message) => WireEnvelope {
                is_error: true,
                content: vec![ContentItem::text(message.clone())],
            },
        }
    }

    /// Serialize into the wire envelope as a JSON value.
    pub fn to_wire_value(&self) -> serde_json::Value {
        serde_json::to_value(self.to_wire()).unwrap_or_else(|_| {
            serde_json::json!({
                "isError": true,
                "content": [{"type": "text", "text": "Invalid tool response format."}],
            })
        })
    }
}

/// The JSON document a worker emits on stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(rename = "isError")]
    pub is_error: bool,
    pub content: Vec<ContentItem>,
}

/// One content item inside the envelope. Only text items exist on the wire;
/// JSON results travel as JSON-encoded text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentItem {
    /// Create a text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: String::from("text"),
            text: text.into(),
        }
    }
}

/// Reconstruct a typed response from decoded worker output.
///
/// The input must carry an `isError` flag and a non-empty `content` list.
/// For success envelopes, the first content item's text is re-parsed: if it
/// decodes to a JSON object or array the result is a [`ToolResponse::Json`],
/// otherwise the literal text is returned. Anything malformed yields an
/// `Error("Invalid tool response format.")` rather than a parse failure.
pub fn reconstruct(data: &serde_json::Value) -> ToolResponse {
    let Some(object) = data.as_object() else {
        return ToolResponse::error("Invalid tool response format.");
    };

    if !object.contains_key("isError") || !object.contains_key("content") {
        return ToolResponse::error("Invalid tool response format.");
    }

    let is_error = object
        .get("isError")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    let content = object.get("content").and_then(serde_json::Value::as_array);

    if is_error {
        let message = content
            .and_then(|items| items.first())
            .and_then(|item| item.get("text"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Unknown error");

        return ToolResponse::error(message);
    }

    let Some(first) = content.and_then(|items| items.first()) else {
        return ToolResponse::error("Invalid tool response format.");
    };

    let text = first
        .get("text")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    if let Ok(decoded) = serde_json::from_str::<serde_json::Value>(text)
        && (decoded.is_object() || decoded.is_array())
    {
        return ToolResponse::json(decoded);
    }

    ToolResponse::text(text)
}
