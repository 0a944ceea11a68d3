use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GmxGuiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown force field: {0}")]
    UnknownForceField(String),
}

pub type Result<T> = std::result::Result<T, GmxGuiError>;

/// Errors returned by the JSON API. Rendered as `{"error": "..."}` with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Deletion of project {0} requires confirm=true")]
    ConfirmationRequired(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)             => StatusCode::NOT_FOUND,
            ApiError::ConfirmationRequired(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_)           => StatusCode::BAD_REQUEST,
            ApiError::Internal(_)             => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GmxGuiError> for ApiError {
    fn from(err: GmxGuiError) -> Self {
        match err {
            GmxGuiError::UnknownForceField(ff) => ApiError::BadRequest(format!("unknown force field {ff}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ConfirmationRequired("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_forcefield_is_bad_request() {
        let api: ApiError = GmxGuiError::UnknownForceField("martini".into()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert!(api.to_string().contains("martini"));
    }
}
