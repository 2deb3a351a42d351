use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;

/// Error returned by handlers; rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_validation() {
            Self::bad_request(e.message())
        } else if e.is_not_found() {
            Self::new(StatusCode::NOT_FOUND, e.message())
        } else {
            // storage details are logged by the service layer
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage error")
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::bad_request("id must be an integer")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query string: {}", rejection.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn maps_service_errors_to_status() {
        let e: ApiError = ServiceError::from(ModelError::Validation("price is required".into())).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.message(), "price is required");

        let e: ApiError = ServiceError::not_found("subscription 3").into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);

        let e: ApiError = ServiceError::Db("connection reset".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message(), "storage error");

        let e: ApiError = ServiceError::from(ModelError::Db("insert failed".into())).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn startup_error_wraps_io_and_database() {
        let e: StartupError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert_eq!(e.to_string(), "port taken");
        let e = StartupError::Database("timed out".into());
        assert_eq!(e.to_string(), "database unavailable: timed out");
    }
}
