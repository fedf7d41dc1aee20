use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection refused, timeout, TLS, or a body that could not be read.
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's own message when it sent one.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response carrying `"success": false`.
    #[error("backend rejected request: {message}")]
    Rejected { message: String },

    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text fit for showing to an admin: the backend's message where there
    /// is one, otherwise the error description.
    pub fn message(&self) -> String {
        match self {
            BackendError::Status { message, .. } | BackendError::Rejected { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Pull `message` (or `error`) out of a backend JSON body.
pub(crate) fn body_message(body: &Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
