use thiserror::Error;

/// Message shown when the backend fails without saying why.
pub const GENERIC_API_ERROR: &str = "API error";

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx status but the body says `"ok": false`.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Connection refused, reset, DNS failure and so on.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not JSON or did not have the expected shape.
    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for a notice: the server's own message when it sent
    /// one, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected(message) => message.clone(),
            Self::Transport(e) if e.is_connect() => "backend unreachable".to_string(),
            Self::Transport(_) | Self::Decode(_) => GENERIC_API_ERROR.to_string(),
        }
    }
}

/// Pull the `error` string out of a response body, if any.
pub(crate) fn server_message(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|e| e.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(GENERIC_API_ERROR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_prefers_body() {
        assert_eq!(
            server_message(&json!({ "ok": false, "error": "userId es obligatorio." })),
            "userId es obligatorio."
        );
        assert_eq!(server_message(&json!({ "ok": false })), GENERIC_API_ERROR);
        assert_eq!(server_message(&json!({ "error": "  " })), GENERIC_API_ERROR);
    }

    #[test]
    fn test_user_message() {
        let e = ApiError::Status {
            status: 400,
            message: "Nombre y DNI son obligatorios.".into(),
        };
        assert_eq!(e.user_message(), "Nombre y DNI son obligatorios.");
        assert_eq!(
            ApiError::Decode("expected value".into()).user_message(),
            GENERIC_API_ERROR
        );
    }
}
