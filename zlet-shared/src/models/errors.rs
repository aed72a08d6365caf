use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the registration server.
///
/// `detail` is usually a string, but validation failures send a list of
/// objects instead.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Value,
}

impl ErrorBody {
    /// Creates a body carrying a plain string detail.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Value::String(detail.into()),
        }
    }

    /// Human readable form of `detail`.
    ///
    /// Strings are returned as is, validation lists collapse to their `msg`
    /// entries, and anything else is rendered as compact JSON.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.detail {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
