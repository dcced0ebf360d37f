//! API error types with HTTP response mapping.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Request fields failed validation, keyed by field path.
    Validation(BTreeMap<String, String>),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "bad request");
                error_body(StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Validation(fields) => {
                tracing::warn!(?fields, "validation failed");
                let body = serde_json::json!({
                    "error": "Validation failed",
                    "fields": fields,
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            ApiError::Domain(err) => domain_error_to_response(err),
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}

fn domain_error_to_response(err: DomainError) -> Response {
    let status = match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::warn!(error = %err, "request rejected");
    }

    error_body(status, err.to_string())
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ItemId, OrderId};
    use store::StoreError;
    use user_directory::DirectoryError;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::OrderNotFound(OrderId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::ItemNotFound(ItemId::new(1))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_argument_maps_to_400() {
        assert_eq!(
            status_of(DomainError::InvalidArgument("ID can't be null".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::Conflict("fk".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn upstream_maps_to_503() {
        assert_eq!(
            status_of(DomainError::UpstreamUnavailable(DirectoryError::Unavailable(
                "down".to_string()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn store_failure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Store(StoreError::Corrupt("x".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_maps_to_400() {
        let mut fields = BTreeMap::new();
        fields.insert("userId".to_string(), "must be positive".to_string());
        assert_eq!(
            ApiError::Validation(fields).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
