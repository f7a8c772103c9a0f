//! Backend error envelopes
//!
//! The data API reports failures as `{code, message, details, hint}`; the
//! auth service uses `{error, error_description}` or `{msg}`. Both collapse
//! into a single code/message pair via [`RemoteErrorBody::into_parts`].

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on a non-success status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl RemoteErrorBody {
    /// Collapse into `(code, message)`.
    ///
    /// The message prefers the most descriptive field present; `None` when the
    /// body carried no message at all.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        let code = match self.code {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Null) | None => self.error.clone(),
            Some(other) => Some(other.to_string()),
        };
        let message = self
            .message
            .or(self.error_description)
            .or(self.msg)
            .or(self.error);
        (code, message)
    }
}
