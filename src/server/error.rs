//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{Error, ErrorKind};

/// An [`Error`] on its way out as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub Error);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::SecretId;
    use crate::error::{StoreError, ValidationError};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_status_codes() {
        let err = ApiError::from(ValidationError::MissingField("path"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(Error::NotFound(SecretId::new("a", "b")));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let inner = Error::from(StoreError::NoRecipients(PathBuf::from(".gpg-id")));
        let err = ApiError::from(Error::Unavailable(Arc::new(inner)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
