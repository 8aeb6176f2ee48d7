//! Axum route handlers for the Teams API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::{Team, TeamPayload};
use crate::notifier::{ConnectionStatus, DeliveryResult};
use crate::state::AppState;
use crate::teams::sample_application;

#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub success: bool,
    pub count: usize,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub team: Team,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: &'static str,
    pub recipients: Vec<String>,
    pub email_result: DeliveryResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStatusResponse {
    pub success: bool,
    pub transport: &'static str,
    pub email_service: ConnectionStatus,
}

fn team_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Team with ID \"{id}\" does not exist"))
}

/// GET /api/teams
pub async fn handle_list(State(state): State<AppState>) -> Json<TeamListResponse> {
    let teams = state.store.all_teams().await;
    Json(TeamListResponse {
        success: true,
        count: teams.len(),
        teams,
    })
}

/// GET /api/teams/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamResponse>, AppError> {
    let team = state
        .store
        .team_by_id(&id)
        .await
        .ok_or_else(|| team_not_found(&id))?;

    Ok(Json(TeamResponse {
        success: true,
        message: None,
        team,
    }))
}

/// POST /api/teams
pub async fn handle_create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TeamPayload>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let team = Team::from_payload(payload);
    team.validate()?;

    if state.store.team_by_name(&team.name).await.is_some() {
        return Err(AppError::Conflict(format!(
            "A team with the name \"{}\" already exists",
            team.name
        )));
    }
    if state.store.team_by_id(&team.id).await.is_some() {
        return Err(AppError::Conflict(format!(
            "A team with the ID \"{}\" already exists",
            team.id
        )));
    }

    let saved = state.store.save_team(team).await?;
    info!("New team created: {} ({})", saved.name, saved.id);

    Ok((
        StatusCode::CREATED,
        Json(TeamResponse {
            success: true,
            message: Some("Team created successfully"),
            team: saved,
        }),
    ))
}

/// PUT /api/teams/:id — full replace; the path id wins over any id in the body.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TeamPayload>,
) -> Result<Json<TeamResponse>, AppError> {
    let existing = state
        .store
        .team_by_id(&id)
        .await
        .ok_or_else(|| team_not_found(&id))?;

    let team = Team::from_payload(TeamPayload {
        id: Some(id.clone()),
        created_at: payload.created_at.or(Some(existing.created_at)),
        ..payload
    });
    team.validate()?;

    if let Some(other) = state.store.team_by_name(&team.name).await {
        if other.id != id {
            return Err(AppError::Conflict(format!(
                "Another team with the name \"{}\" already exists",
                team.name
            )));
        }
    }

    let saved = state.store.save_team(team).await?;
    info!("Team updated: {} ({})", saved.name, saved.id);

    Ok(Json(TeamResponse {
        success: true,
        message: Some("Team updated successfully"),
        team: saved,
    }))
}

/// DELETE /api/teams/:id — applications naming the team are kept.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let removed = state.store.delete_team(&id).await?;
    info!("Team deleted: {} ({})", removed.name, removed.id);

    Ok(Json(DeleteResponse {
        success: true,
        message: "Team deleted successfully",
    }))
}

/// POST /api/teams/:id/test-email
pub async fn handle_test_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TestEmailResponse>, AppError> {
    let team = state
        .store
        .team_by_id(&id)
        .await
        .ok_or_else(|| team_not_found(&id))?;

    let recipients = team.recipients();
    let result = state
        .notifier
        .send_application_notification(&sample_application(&team), &recipients)
        .await;
    info!("Test email for team {}: sent={}", team.name, result.success);

    Ok(Json(TestEmailResponse {
        success: true,
        message: if result.success {
            "Test email sent successfully"
        } else {
            "Test email could not be delivered"
        },
        recipients,
        email_result: result,
    }))
}

/// GET /api/teams/email/status
pub async fn handle_email_status(State(state): State<AppState>) -> Json<EmailStatusResponse> {
    Json(EmailStatusResponse {
        success: true,
        transport: state.notifier.transport_name(),
        email_service: state.notifier.test_connection().await,
    })
}
