//! Gemini-specific error handling.

use solveai_core::Error;

/// Gemini error classes, from HTTP status and the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiErrorCode {
    /// Key missing, invalid, or lacking permission.
    PermissionDenied,
    /// Quota or rate limit exhausted.
    ResourceExhausted,
    /// Model not found or not available.
    ModelNotFound,
    /// Request rejected as invalid.
    InvalidArgument,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl GeminiErrorCode {
    /// Determine error code from HTTP status and error status string.
    pub fn from_response(status: u16, error_status: &str) -> Self {
        match (status, error_status) {
            (401 | 403, _) | (_, "PERMISSION_DENIED" | "UNAUTHENTICATED") => {
                Self::PermissionDenied
            }
            (429, _) | (_, "RESOURCE_EXHAUSTED") => Self::ResourceExhausted,
            (404, _) | (_, "NOT_FOUND") => Self::ModelNotFound,
            (400, _) | (_, "INVALID_ARGUMENT") => Self::InvalidArgument,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a Gemini error to a SolveAI error.
///
/// Every upstream failure is an inference failure. The message names the
/// class and HTTP status only; the upstream body is logged by the caller.
pub fn to_solveai_error(code: GeminiErrorCode, status: u16) -> Error {
    let reason = match code {
        GeminiErrorCode::PermissionDenied => "acesso negado",
        GeminiErrorCode::ResourceExhausted => "limite de uso excedido",
        GeminiErrorCode::ModelNotFound => "modelo não encontrado",
        GeminiErrorCode::InvalidArgument => "requisição inválida",
        GeminiErrorCode::ServerError => "erro no servidor",
        GeminiErrorCode::Unknown => "erro desconhecido",
    };
    Error::Inference(format!(
        "Falha na chamada ao modelo Gemini ({}, HTTP {})",
        reason, status
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_403() {
        let code = GeminiErrorCode::from_response(403, "PERMISSION_DENIED");
        assert_eq!(code, GeminiErrorCode::PermissionDenied);
    }

    #[test]
    fn test_error_code_from_400() {
        let code = GeminiErrorCode::from_response(400, "INVALID_ARGUMENT");
        assert_eq!(code, GeminiErrorCode::InvalidArgument);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = GeminiErrorCode::from_response(429, "RESOURCE_EXHAUSTED");
        assert_eq!(code, GeminiErrorCode::ResourceExhausted);
    }

    #[test]
    fn test_error_code_from_404() {
        let code = GeminiErrorCode::from_response(404, "NOT_FOUND");
        assert_eq!(code, GeminiErrorCode::ModelNotFound);
    }

    #[test]
    fn test_error_code_from_503() {
        let code = GeminiErrorCode::from_response(503, "UNAVAILABLE");
        assert_eq!(code, GeminiErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = GeminiErrorCode::from_response(418, "");
        assert_eq!(code, GeminiErrorCode::Unknown);
    }

    #[test]
    fn test_every_code_is_inference_error() {
        for (code, status) in [
            (GeminiErrorCode::PermissionDenied, 403),
            (GeminiErrorCode::ModelNotFound, 404),
            (GeminiErrorCode::ResourceExhausted, 429),
            (GeminiErrorCode::ServerError, 503),
        ] {
            let err = to_solveai_error(code, status);
            assert!(matches!(err, Error::Inference(_)), "{:?}", code);
            assert!(err.to_string().contains(&format!("HTTP {}", status)));
        }
    }
}
