pub mod health;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::errors::reveal_internal_details;
use crate::state::AppState;
use crate::teams::handlers as teams;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Applications
        .route(
            "/api/applications",
            post(applications::handle_submit).get(applications::handle_list),
        )
        .route(
            "/api/applications/stats/summary",
            get(applications::handle_stats),
        )
        .route("/api/applications/:id", get(applications::handle_get))
        .route(
            "/api/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Teams
        .route("/api/teams", get(teams::handle_list).post(teams::handle_create))
        .route("/api/teams/email/status", get(teams::handle_email_status))
        .route(
            "/api/teams/:id",
            get(teams::handle_get)
                .put(teams::handle_update)
                .delete(teams::handle_delete),
        )
        .route("/api/teams/:id/test-email", post(teams::handle_test_email))
        .fallback(health::not_found_handler)
        .layer(middleware::map_response_with_state(
            state.clone(),
            reveal_internal_details,
        ))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use serde_json::json;

    use super::test_support::{send, send_raw, TestApp};

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "Email Backend");
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Executive Hiring Notification System");
        assert_eq!(body["endpoints"]["teams"], "/api/teams");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::GET, "/api/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/api/nothing");
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_a_json_400() {
        let app = TestApp::new().await;
        let (status, body) = send_raw(
            &app.router,
            Method::POST,
            "/api/applications",
            Some("application/json"),
            "{oops",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_a_json_400() {
        let app = TestApp::new().await;
        let payload = json!({ "name": "Ops", "executives": ["coo@company.com"] });
        let (status, body) = send_raw(
            &app.router,
            Method::POST,
            "/api/teams",
            None,
            &payload.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(app.state.store.team_by_name("Ops").await.is_none());
    }
}
