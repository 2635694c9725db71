use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ikara::PredictError;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: String,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: &'static str,
        public_message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            public_code,
            public_message: public_message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            msg,
        )
    }

    /// Extractor rejection (malformed or oversized body)
    pub fn rejected(status: StatusCode, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Rejected request body: {}", msg);
        Self::new(status, "INVALID_BODY", msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.public_code
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            error: &'a str,
            code: &'a str,
        }

        (
            self.status,
            Json(ErrorBody {
                error: &self.public_message,
                code: self.public_code,
            }),
        )
            .into_response()
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        if err.is_client_error() {
            tracing::warn!("Prediction rejected: {}", err);
            Self::new(
                StatusCode::BAD_REQUEST,
                err.code(),
                err.to_string(),
            )
        } else {
            tracing::error!("Prediction failed: {:?}", err);
            Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                err.to_string(),
            )
        }
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code)
    }
}

// Convenience macro for quick error creation
#[macro_export]
macro_rules! internal {
    ($($arg:tt)*) => { $crate::error::ApiError::internal(format!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_requests() {
        let err = ApiError::from(PredictError::NoImageProvided);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "NO_IMAGE_PROVIDED");
        assert!(!err.is_server_error());
    }

    #[test]
    fn server_errors_are_internal() {
        let err = ApiError::from(PredictError::NoModelAvailable);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "NO_MODEL_AVAILABLE");
        assert!(err.is_server_error());

        let err = ApiError::from(PredictError::InferenceError("oom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INFERENCE_ERROR");
    }
}
