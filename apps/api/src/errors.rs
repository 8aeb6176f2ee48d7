use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::ValidationError;
use crate::state::AppState;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Team \"{team}\" not found")]
    InvalidTeam {
        team: String,
        available: Vec<String>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Unparseable bodies, mistyped fields and a missing JSON content type are
/// all client input errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AppError::NotFound(format!("{what} does not exist")),
            other => AppError::Storage(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {msg}");
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
            }
            AppError::Validation(msg) => {
                tracing::warn!("Validation failed: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::InvalidTeam { team, .. } => {
                tracing::warn!("Unknown team: {team}");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_TEAM",
                    format!("Team \"{team}\" not found. Please use one of the existing teams."),
                )
            }
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {msg}");
                (StatusCode::BAD_REQUEST, "CONFLICT", msg.clone())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                return internal_response("STORAGE_ERROR", "A storage error occurred", e);
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                return internal_response(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    e,
                );
            }
        };

        let mut body = error_body(code, &message);
        if let AppError::InvalidTeam { available, .. } = &self {
            body["availableTeams"] = json!(available);
        }

        (status, Json(body)).into_response()
    }
}

/// Underlying message of a 500, carried as a response extension until
/// [`reveal_internal_details`] decides whether the client may see it.
#[derive(Debug, Clone)]
pub struct InternalDetail {
    code: &'static str,
    message: String,
}

fn internal_response(code: &'static str, generic: &str, e: &impl std::fmt::Display) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body(code, generic)),
    )
        .into_response();
    response.extensions_mut().insert(InternalDetail {
        code,
        message: e.to_string(),
    });
    response
}

fn error_body(code: &str, message: &str) -> Value {
    json!({
        "success": false,
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Response middleware: outside production, 500 bodies carry the underlying
/// error message instead of the generic one.
pub async fn reveal_internal_details(State(state): State<AppState>, mut response: Response) -> Response {
    let Some(detail) = response.extensions_mut().remove::<InternalDetail>() else {
        return response;
    };
    if state.config.is_production() {
        return response;
    }

    let status = response.status();
    (status, Json(error_body(detail.code, &detail.message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::TestApp;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let response = AppError::from(ValidationError::InvalidApplicantEmail).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Invalid email format");
    }

    #[tokio::test]
    async fn test_store_not_found_maps_to_404() {
        let response =
            AppError::from(StoreError::NotFound("Team \"x\"".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Team \"x\" does not exist");
    }

    #[tokio::test]
    async fn test_invalid_team_lists_available() {
        let response = AppError::InvalidTeam {
            team: "Sales".to_string(),
            available: vec!["Engineering".to_string(), "Product".to_string()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["availableTeams"], json!(["Engineering", "Product"]));
        assert_eq!(body["error"]["code"], "INVALID_TEAM");
    }

    #[tokio::test]
    async fn test_internal_error_is_500_with_generic_message() {
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[tokio::test]
    async fn test_internal_details_follow_environment() {
        let app = TestApp::new().await;
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        let response = reveal_internal_details(State(app.state.clone()), response).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["message"], "disk on fire");

        let mut state = app.state.clone();
        state.config.environment = "production".to_string();
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        let response = reveal_internal_details(State(state), response).await;
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[tokio::test]
    async fn test_client_errors_pass_through_untouched() {
        let app = TestApp::new().await;
        let response = AppError::Validation("bad".to_string()).into_response();
        let response = reveal_internal_details(State(app.state.clone()), response).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "bad");
    }
}
