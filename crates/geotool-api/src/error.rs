use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geotool_core::GeotoolError;
use geotool_offline::OfflineError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeotoolError> for ApiError {
    fn from(err: GeotoolError) -> Self {
        match &err {
            GeotoolError::UnsupportedFormat { .. } => {
                Self::bad_request("Unsupported format").with_details(err.to_string())
            }
            GeotoolError::FormatValidation { .. } => {
                Self::bad_request("Invalid file").with_details(err.to_string())
            }
            GeotoolError::InvalidCoordinate { .. } => {
                Self::bad_request("Invalid coordinate").with_details(err.to_string())
            }
            GeotoolError::NothingToExport => {
                Self::not_found("No captures to export").with_details(err.to_string())
            }
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}

impl From<OfflineError> for ApiError {
    fn from(err: OfflineError) -> Self {
        match &err {
            OfflineError::InvalidUrl { .. } => {
                Self::bad_request("Invalid URL").with_details(err.to_string())
            }
            OfflineError::InvalidPayload(_) => {
                Self::bad_request("Invalid payload").with_details(err.to_string())
            }
            _ => Self::internal("Offline controller error").with_details(err.to_string()),
        }
    }
}
