use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::AdminConfigError;

/// Error body the backend sends alongside non-2xx responses.
///
/// The backend is not consistent about which key it uses, so both
/// `message` and `error` are read and the first present one wins.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Extract a human-readable message from a raw response body, falling
    /// back to the body itself when it is not a JSON error object.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| body.trim().to_string()),
            Err(_) => body.trim().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{method} {path} failed with status {status}: {message}")]
    HttpStatus {
        method: String,
        path: String,
        status: StatusCode,
        message: String,
    },

    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error(transparent)]
    ConfigError(#[from] AdminConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    /// HTTP status reported by the backend, if the failure came from one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::TransportError(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Names of the form fields that failed validation, sorted.
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            Self::ValidationError(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort();
                fields
            }
            _ => Vec::new(),
        }
    }

    /// Short message suitable for showing next to a form.
    pub fn display_message(&self) -> String {
        match self {
            Self::ValidationError(errors) => {
                let mut lines: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |err| match &err.message {
                            Some(message) => format!("{}: {}", field, message),
                            None => format!("{}: invalid ({})", field, err.code),
                        })
                    })
                    .collect();
                lines.sort();
                lines.join("; ")
            }
            Self::HttpStatus {
                status, message, ..
            } => {
                let reason = status.canonical_reason().unwrap_or("Error");
                if message.is_empty() {
                    reason.to_string()
                } else {
                    format!("{}: {}", reason, message)
                }
            }
            Self::TransportError(_) => "Could not reach the server".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_body_prefers_message_key() {
        let body = r#"{"message":"Product not found","error":"Not Found"}"#;
        assert_eq!(ErrorResponse::message_from_body(body), "Product not found");
    }

    #[test]
    fn message_from_body_falls_back_to_error_key() {
        let body = r#"{"error":"duplicate email"}"#;
        assert_eq!(ErrorResponse::message_from_body(body), "duplicate email");
    }

    #[test]
    fn message_from_body_uses_raw_text() {
        assert_eq!(
            ErrorResponse::message_from_body("  upstream timeout \n"),
            "upstream timeout"
        );
    }

    #[test]
    fn http_status_display_message() {
        let err = AdminError::HttpStatus {
            method: "PUT".into(),
            path: "/api/Product/1".into(),
            status: StatusCode::NOT_FOUND,
            message: "Product not found".into(),
        };
        assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.display_message(), "Not Found: Product not found");
        assert!(!err.is_validation());
    }

    #[test]
    fn config_failures_convert_into_admin_error() {
        use validator::Validate;

        let mut cfg = crate::config::AdminConfig::default();
        cfg.request_timeout_secs = 0;
        let config_err = AdminConfigError::from(cfg.validate().unwrap_err());

        let err = AdminError::from(config_err);
        assert!(matches!(err, AdminError::ConfigError(AdminConfigError::Validation(_))));
        assert!(!err.is_validation());
        assert!(err.to_string().starts_with("Configuration validation failed"));
    }
}
