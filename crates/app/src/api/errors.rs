//! API errors.

use reqwest::StatusCode;
use thiserror::Error;

use tani::envelope::{ErrorBody, FieldErrors};

const DEFAULT_VALIDATION_MESSAGE: &str = "The given data was invalid.";

/// Failure talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 or 403
    #[error("not authenticated")]
    Unauthenticated { message: Option<String> },

    /// 404
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// 422, or any client error carrying a field-error map
    #[error("{}", validation_summary(.message, .errors))]
    Validation {
        message: Option<String>,
        errors: FieldErrors,
    },

    /// Any other non-success status
    #[error("server responded with {status}")]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("http error")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),

    #[error("base url cannot carry path segments")]
    InvalidBaseUrl,
}

fn validation_summary<'a>(message: &'a Option<String>, errors: &'a FieldErrors) -> &'a str {
    message
        .as_deref()
        .or_else(|| errors.first())
        .unwrap_or(DEFAULT_VALIDATION_MESSAGE)
}

impl ApiError {
    /// Classify a non-success response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let ErrorBody { message, errors } = serde_json::from_slice(body).unwrap_or_default();
        let message = message.filter(|message| !message.trim().is_empty());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthenticated { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation { message, errors },
            status if status.is_client_error() && !errors.is_empty() => {
                Self::Validation { message, errors }
            }
            status => Self::Server { status, message },
        }
    }

    /// 401/403, treated uniformly as "log in again".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Primary message sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated { message }
            | Self::NotFound { message }
            | Self::Validation { message, .. }
            | Self::Server { message, .. } => message.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidBaseUrl => None,
        }
    }

    /// Per-field validation messages of a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Server message, else the first field message, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message()
            .or_else(|| self.field_errors().and_then(FieldErrors::first))
            .unwrap_or(fallback)
            .to_string()
    }

    /// Server message (or `fallback`) followed by every field message, one
    /// per line.
    pub fn detailed_message(&self, fallback: &str) -> String {
        let mut message = self.server_message().unwrap_or(fallback).to_string();

        if let Some(errors) = self.field_errors().filter(|errors| !errors.is_empty()) {
            message.push_str("\n\nDetail:\n");
            message.push_str(&errors.flattened().collect::<Vec<_>>().join("\n"));
        }

        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_and_forbidden_are_unauthenticated() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let error = ApiError::from_response(status, br#"{"message":"Unauthenticated."}"#);

            assert!(error.is_unauthenticated(), "expected unauthenticated for {status}");
            assert_eq!(error.server_message(), Some("Unauthenticated."));
        }
    }

    #[test]
    fn not_found_without_body() {
        let error = ApiError::from_response(StatusCode::NOT_FOUND, b"");

        assert!(error.is_not_found());
        assert_eq!(error.server_message(), None);
    }

    #[test]
    fn unprocessable_entity_carries_field_errors() {
        let error = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":"Stok tidak cukup.","errors":{"quantity":["Maksimal 5."]}}"#,
        );

        assert_eq!(error.server_message(), Some("Stok tidak cukup."));
        assert_eq!(
            error.field_errors().and_then(FieldErrors::first),
            Some("Maksimal 5.")
        );
    }

    #[test]
    fn bad_request_with_errors_is_validation() {
        let error = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"errors":{"items":["Minimal satu item."]}}"#,
        );

        assert!(matches!(error, ApiError::Validation { .. }), "got {error:?}");
    }

    #[test]
    fn first_field_message_stands_in_for_missing_message() {
        let error = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"errors":{"quantity":["Stok tidak cukup."]}}"#,
        );

        assert_eq!(error.message_or("Gagal"), "Stok tidak cukup.");
        assert_eq!(error.server_message(), None);
        assert_eq!(error.to_string(), "Stok tidak cukup.");
    }

    #[test]
    fn detailed_message_without_server_message_leads_with_fallback() {
        let error = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"errors":{"nomor_whatsapp":["Nomor wajib diisi."]}}"#,
        );

        assert_eq!(
            error.detailed_message("Terjadi kesalahan saat membuat pesanan."),
            "Terjadi kesalahan saat membuat pesanan.\n\nDetail:\nNomor wajib diisi."
        );
    }

    #[test]
    fn empty_validation_body_uses_default_message() {
        let error = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, b"{}");

        assert_eq!(error.to_string(), DEFAULT_VALIDATION_MESSAGE);
        assert_eq!(error.message_or("Gagal"), "Gagal");
    }

    #[test]
    fn detailed_message_lists_field_errors() {
        let error = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":"Data tidak valid.","errors":{"nomor_whatsapp":["Wajib."],"items":["Kosong.","Stok."]}}"#,
        );

        assert_eq!(
            error.detailed_message("Gagal membuat pesanan."),
            "Data tidak valid.\n\nDetail:\nWajib.\nKosong.\nStok."
        );
    }

    #[test]
    fn html_error_page_is_server_error() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>502</html>");

        assert!(
            matches!(
                error,
                ApiError::Server {
                    status: StatusCode::BAD_GATEWAY,
                    message: None
                }
            ),
            "got {error:?}"
        );
        assert_eq!(error.message_or("fallback"), "fallback");
    }
}
