use axum::http::StatusCode;
use std::fmt;

/// Failures raised by the window and comparison computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    InvalidArgument(String),
    InsufficientData(String),
}

impl AnalyticsError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::InsufficientData(message) => write!(f, "insufficient data: {message}"),
        }
    }
}

impl std::error::Error for AnalyticsError {}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidArgument(_) => Self::bad_request(err.to_string()),
            AnalyticsError::InsufficientData(_) => Self::unprocessable(err.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_errors_map_to_client_statuses() {
        let invalid: AppError = AnalyticsError::invalid_argument("days must be at least 1").into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert!(invalid.message.contains("days must be at least 1"));

        let short: AppError = AnalyticsError::insufficient_data("one row").into();
        assert_eq!(short.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
