use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Failures reported to HTTP clients
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,
    #[error("Need a user name!")]
    MissingName,
    #[error("Invalid user id")]
    InvalidId(String),
    #[error("{0}")]
    MalformedBody(String),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingName | ApiError::InvalidId(_) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InvalidId(raw) = &self {
            debug!("rejected user id {:?}", raw);
        }
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::MissingName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidId("abc".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(ApiError::UserNotFound.to_string(), "User not found");
        assert_eq!(ApiError::MissingName.to_string(), "Need a user name!");
        assert_eq!(ApiError::InvalidId("x".into()).to_string(), "Invalid user id");
    }
}
