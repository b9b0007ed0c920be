//! Error responses for the HTTP service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::OrderError;

/// Error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// The engine rejected the request.
    Order(OrderError),
    /// The request asked for more keys than the service allows.
    BatchTooLarge { requested: usize, max: usize },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Order(OrderError::DuplicateKey(_)) => StatusCode::CONFLICT,
            Self::Order(_) => StatusCode::BAD_REQUEST,
            Self::BatchTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Order(e) => write!(f, "{e}"),
            Self::BatchTooLarge { requested, max } => {
                write!(f, "requested {requested} keys, at most {max} allowed")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Order(e) => Some(e),
            Self::BatchTooLarge { .. } => None,
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        Self::Order(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), "rejecting request: {self}");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordField;
    use crate::testing::key;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Order(OrderError::DuplicateKey(key("d"))).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Order(OrderError::MissingField(RecordField::Order)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BatchTooLarge {
                requested: 10,
                max: 5
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_batch_too_large_display() {
        let error = ApiError::BatchTooLarge {
            requested: 10,
            max: 5,
        };
        assert_eq!(error.to_string(), "requested 10 keys, at most 5 allowed");
    }
}
