// HTTP request handlers
use crate::application::refresh_scheduler::SchedulerPhase;
use crate::domain::dashboard::Tab;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scheduler: SchedulerPhase,
    pub stale: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let scheduler = *state.scheduler_phase.borrow();
    let status = if scheduler == SchedulerPhase::Stopped {
        "stopped"
    } else {
        "ok"
    };
    Json(HealthResponse {
        status,
        scheduler,
        stale: state.dashboard_service.snapshot().stale,
    })
}

/// Current render model
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let model = state.dashboard_service.snapshot();
    match json_response(&model, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Tab click from a viewer
pub async fn select_tab(
    Path(tab): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let tab: Tab = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let model = state.dashboard_service.select_tab(tab);
    match json_response(&model, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Live stream of render models (current snapshot first)
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Subscribe before snapshotting so no update between the two is lost
    let rx = state.presenter.subscribe();
    let initial = state.dashboard_service.snapshot();
    tracing::debug!("Viewer connected ({} total)", state.presenter.viewer_count());
    stream_from_receiver(initial, rx, accepts_brotli(&headers)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_state::DashboardState;
    use crate::infrastructure::broadcast_presenter::BroadcastPresenter;
    use tokio::sync::watch;

    fn app_state_with_phase(phase: SchedulerPhase) -> Arc<AppState> {
        let presenter = Arc::new(BroadcastPresenter::new());
        let dashboard_service =
            DashboardService::new(Arc::new(DashboardState::new()), presenter.clone());
        let (_, scheduler_phase) = watch::channel(phase);
        Arc::new(AppState {
            dashboard_service,
            presenter,
            scheduler_phase,
        })
    }

    fn app_state() -> Arc<AppState> {
        app_state_with_phase(SchedulerPhase::Idle)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_scheduler_phase() {
        let Json(health) = health_check(State(app_state_with_phase(SchedulerPhase::Polling))).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.scheduler, SchedulerPhase::Polling);
        assert!(!health.stale);

        let response = health_check(State(app_state_with_phase(SchedulerPhase::Stopped)))
            .await
            .into_response();
        let json = body_json(response).await;
        assert_eq!(json["status"], "stopped");
        assert_eq!(json["scheduler"], "stopped");
    }

    #[tokio::test]
    async fn test_get_dashboard_before_first_sample() {
        let response = get_dashboard(HeaderMap::new(), State(app_state())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["active_tab"], "controls");
        assert!(json["reading"].is_null());
        assert_eq!(json["stale"], false);
    }

    #[tokio::test]
    async fn test_select_tab_updates_state_and_viewers() {
        let state = app_state();
        let mut viewer = state.presenter.subscribe();

        let response = select_tab(
            Path("health".to_string()),
            HeaderMap::new(),
            State(state.clone()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["active_tab"], "health");
        assert_eq!(viewer.recv().await.unwrap().active_tab, Tab::Health);
        assert_eq!(state.dashboard_service.snapshot().active_tab, Tab::Health);
    }

    #[tokio::test]
    async fn test_select_unknown_tab_is_bad_request() {
        let state = app_state();

        let response = select_tab(
            Path("settings".to_string()),
            HeaderMap::new(),
            State(state.clone()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.dashboard_service.snapshot().active_tab, Tab::Controls);
    }
}
