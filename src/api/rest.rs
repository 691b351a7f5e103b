// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Read-only status surface under `/api/v1/`.  Dashboards poll the report
// endpoint instead of re-reading the text file from disk.
//
// CORS is configured permissively; the API exposes nothing but the report
// that is already written to disk.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::AppState;

// =============================================================================
// Router construction
// =============================================================================

/// Build the status API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/report", get(report))
        .route("/api/v1/snapshots", get(snapshots))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cycles_completed: u64,
    last_cycle_at: Option<String>,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        cycles_completed: state.cycles_completed(),
        last_cycle_at: state.latest().map(|c| c.completed_at.to_rfc3339()),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Report text
// =============================================================================

async fn report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.latest_report() {
        Some(text) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            text,
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CACHE_CONTROL, "no-store")],
            "no snapshot cycle has completed yet",
        )
            .into_response(),
    }
}

// =============================================================================
// Structured snapshots
// =============================================================================

async fn snapshots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.latest() {
        Some(cycle) => Json(serde_json::json!({
            "cycle_id": cycle.cycle_id,
            "completed_at": cycle.completed_at.to_rfc3339(),
            "snapshots": cycle.snapshots,
        }))
        .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "snapshots": null, "message": "No snapshot cycle has completed yet" })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::PublishedCycle;
    use crate::snapshot::Snapshot;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_path(state: Arc<AppState>, path: &str) -> (StatusCode, Option<String>, String) {
        let resp = router(state)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn published_state() -> Arc<AppState> {
        let state = Arc::new(AppState::new());
        state.publish(PublishedCycle {
            cycle_id: "c-1".into(),
            completed_at: chrono::Utc::now(),
            report: "[WARNING] No data for DXY\nACTION PROMPT TO GPT:".into(),
            snapshots: vec![Snapshot::NoData {
                symbol: "DXY".into(),
                contract: None,
                tick: None,
            }],
        });
        state
    }

    #[tokio::test]
    async fn health_reports_cycle_count() {
        let (status, _, body) = get_path(published_state(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["cycles_completed"], 1);
    }

    #[tokio::test]
    async fn report_unavailable_before_first_cycle() {
        let (status, _, _) = get_path(Arc::new(AppState::new()), "/api/v1/report").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _, _) = get_path(Arc::new(AppState::new()), "/api/v1/snapshots").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn report_served_as_plain_text() {
        let (status, content_type, body) = get_path(published_state(), "/api/v1/report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(body, "[WARNING] No data for DXY\nACTION PROMPT TO GPT:");
    }

    #[tokio::test]
    async fn snapshots_served_as_json() {
        let (status, _, body) = get_path(published_state(), "/api/v1/snapshots").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["cycle_id"], "c-1");
        assert_eq!(json["snapshots"][0]["status"], "no_data");
        assert_eq!(json["snapshots"][0]["symbol"], "DXY");
    }
}
