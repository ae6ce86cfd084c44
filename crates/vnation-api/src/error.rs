//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::config::is_production_environment;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// An account request was refused. Rendered as `{"error": ...}`.
    #[error("{0}")]
    AccountRejected(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Orchestrator(#[from] vnation_providers::OrchestratorError),

    #[error("Store error: {0}")]
    Store(#[from] vnation_store::StoreError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn account_rejected(msg: impl Into<String>) -> Self {
        Self::AccountRejected(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AccountRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) | ApiError::Orchestrator(_) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Serialize)]
struct AccountErrorResponse {
    error: String,
}

impl ApiError {
    fn render(self, hide_internal: bool) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Store(_) if hide_internal => {
                "An internal error occurred".to_string()
            }
            ApiError::AccountRejected(msg) => {
                let body = AccountErrorResponse { error: msg.clone() };
                return (status, Json(body)).into_response();
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let production = std::env::var("ENVIRONMENT")
            .map(|env| is_production_environment(&env))
            .unwrap_or(false);
        self.render(production)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vnation_providers::OrchestratorError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::not_found("Job not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::account_rejected("Invalid credentials").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::service_unavailable("Account store not configured").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(OrchestratorError::RefineFailed("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn detail_of(response: Response) -> String {
        use http_body_util::BodyExt;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["detail"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_internal_details_hidden_in_production() {
        let store_err = || ApiError::from(vnation_store::StoreError::unavailable("redis gone"));

        let hidden = store_err().render(true);
        assert_eq!(hidden.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail_of(hidden).await, "An internal error occurred");

        let shown = detail_of(store_err().render(false)).await;
        assert!(shown.contains("redis gone"));

        let refine = ApiError::from(OrchestratorError::RefineFailed("boom".into()));
        assert_eq!(detail_of(refine.render(true)).await, "Refine failed: boom");
    }

    #[test]
    fn test_production_environment_ignores_case() {
        assert!(is_production_environment("production"));
        assert!(is_production_environment("Production"));
        assert!(is_production_environment("PRODUCTION"));
        assert!(!is_production_environment("development"));
        assert!(!is_production_environment(""));
    }

    #[test]
    fn test_refine_failure_message_is_kept() {
        let err = ApiError::from(OrchestratorError::RefineFailed("boom".into()));
        assert_eq!(err.to_string(), "Refine failed: boom");
    }
}
