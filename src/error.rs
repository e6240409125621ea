use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every failure a handler can report. Each variant maps straight to one
/// HTTP status; nothing is retried or recovered server-side.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password; the message never says which. HTTP 401.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Referenced id is absent. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique field or a row still referenced elsewhere. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Catch-all. The raw detail is echoed in the response body.
    #[error("{0}")]
    Server(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Server(_) => "SERVER_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Server(detail) => json!({
                "success": false,
                "code": self.error_code(),
                "message": "Server error",
                "error": detail,
            }),
            other => json!({
                "success": false,
                "code": other.error_code(),
                "message": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => ApiError::Conflict("Duplicate value for a unique field".into()),
                Some("23503") => {
                    ApiError::Conflict("Record is still referenced by other records".into())
                }
                _ => {
                    error!(error = %e, "database error");
                    ApiError::Server(e.to_string())
                }
            },
            _ => {
                error!(error = %e, "database error");
                ApiError::Server(e.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => sqlx_err.into(),
            Err(other) => {
                error!(error = %other, "internal error");
                ApiError::Server(format!("{other:#}"))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Server("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn anyhow_wrapped_sqlx_error_is_unwrapped() {
        let wrapped = anyhow::Error::new(sqlx::Error::RowNotFound).context("get employee");
        let err: ApiError = wrapped.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn other_anyhow_errors_are_server_errors_with_detail() {
        let err: ApiError = anyhow::anyhow!("disk on fire").into();
        match err {
            ApiError::Server(detail) => assert!(detail.contains("disk on fire")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_body_carries_raw_detail() {
        let resp = ApiError::Server("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Server error");
        assert_eq!(body["error"], "boom");
    }
}
