//! Mapping of domain failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Handler error: a `DomainError` rendered as the error envelope.
///
/// NotFound maps to 404, storage failures to 500 and every other variant to
/// 400, with the stable `code()` in the body.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "Request failed on storage");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = ApiResponse::<()>::error_with_code(message, self.0.code());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingStatus;

    #[test]
    fn statuses_follow_error_class() {
        assert_eq!(
            ApiError(DomainError::not_found("Booking", 4)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(DomainError::DateConflict { room_id: 1 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::BookingImmutable {
                status: BookingStatus::Completed
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::Storage("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
