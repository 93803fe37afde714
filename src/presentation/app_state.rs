// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::refresh_scheduler::SchedulerPhase;
use crate::infrastructure::broadcast_presenter::BroadcastPresenter;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub presenter: Arc<BroadcastPresenter>,
    pub scheduler_phase: watch::Receiver<SchedulerPhase>,
}
