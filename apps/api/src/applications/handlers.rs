//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::applications::filter_applications;
use crate::applications::stats::{compute_stats, ApplicationStats};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::{Application, ApplicationStatus, ApplicationSubmission, ValidationError};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub sent: bool,
    pub recipients: Vec<String>,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub application: Application,
    pub notification: NotificationOutcome,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub team: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub applications: Vec<Application>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub application: Application,
}

/// Kept as a raw value so a non-string status is a validation error rather
/// than a body rejection.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ApplicationStats,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/applications
pub async fn handle_submit(
    State(state): State<AppState>,
    JsonBody(submission): JsonBody<ApplicationSubmission>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    submission.status()?;
    let application = Application::from_submission(submission);
    application.validate()?;

    let Some(team) = state.store.team_by_name(&application.team).await else {
        let available = state
            .store
            .all_teams()
            .await
            .into_iter()
            .map(|t| t.name)
            .collect();
        return Err(AppError::InvalidTeam {
            team: application.team,
            available,
        });
    };

    let saved = state.store.save_application(application).await?;
    let recipients = team.recipients();

    let result = state
        .notifier
        .send_application_notification(&saved, &recipients)
        .await;

    info!(
        "Application notification for {} ({}) to team {}: sent={} recipients=[{}]",
        saved.applicant_name,
        saved.position,
        team.name,
        result.success,
        recipients.join(", ")
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Application submitted successfully",
            application: saved,
            notification: NotificationOutcome {
                sent: result.success,
                recipients,
                details: result.message,
                message_id: result.message_id,
            },
        }),
    ))
}

/// GET /api/applications?team=&status=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListResponse> {
    let team = query.team.as_deref().filter(|t| !t.is_empty());
    let status = query.status.as_deref().filter(|s| !s.is_empty());

    let applications = filter_applications(state.store.all_applications().await, team, status);
    Json(ListResponse {
        success: true,
        count: applications.len(),
        applications,
    })
}

/// GET /api/applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = state
        .store
        .application_by_id(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Application with ID \"{id}\" does not exist")))?;

    Ok(Json(ApplicationResponse {
        success: true,
        message: None,
        application,
    }))
}

/// PATCH /api/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let status: ApplicationStatus = match update.status {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.parse::<ApplicationStatus>()?),
        Some(_) => return Err(ValidationError::InvalidStatus.into()),
    }
    .ok_or_else(|| AppError::Validation("Please provide a status value".to_string()))?;

    let application = state.store.update_application_status(&id, status).await?;
    info!("Application {id} moved to {status}");

    Ok(Json(ApplicationResponse {
        success: true,
        message: Some("Application status updated successfully"),
        application,
    }))
}

/// GET /api/applications/stats/summary
pub async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let applications = state.store.all_applications().await;
    Json(StatsResponse {
        success: true,
        stats: compute_stats(&applications, Utc::now()),
    })
}
