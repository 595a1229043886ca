//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

/// Body message for failures whose detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro ao resolver questão";

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<solveai_core::Error> for ApiError {
    fn from(err: solveai_core::Error) -> Self {
        use solveai_core::Error;

        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::FolderNotFound(id) => ApiError::NotFound(format!("Folder not found: {}", id)),
            // These carry messages meant for the end user.
            Error::Config(msg) | Error::EmptyResponse(msg) | Error::MalformedResponse(msg) => {
                ApiError::Internal(msg)
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Dados inválidos: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solveai_core::Error;
    use uuid::Uuid;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::from(Error::InvalidInput("Folder name is required".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Folder name is required"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_folder_not_found_is_404() {
        let err = ApiError::from(Error::FolderNotFound(Uuid::nil()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_config_error_keeps_plain_message() {
        let err = ApiError::from(Error::Config("GEMINI_API_KEY ausente".to_string()));
        assert!(matches!(err, ApiError::Internal(ref m) if m == "GEMINI_API_KEY ausente"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = ApiError::from(Error::Inference("upstream 503".to_string()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = ApiError::from(Error::Inference(
            "Gemini returned 403: API key AIza-secret suspended".to_string(),
        ));
        assert!(matches!(err, ApiError::Internal(ref m) if m == INTERNAL_ERROR_MESSAGE));
    }
}
