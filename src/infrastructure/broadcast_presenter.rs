// Presenter that fans render models out to any number of connected viewers
use crate::application::presenter::Presenter;
use crate::domain::dashboard::RenderModel;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct BroadcastPresenter {
    tx: broadcast::Sender<RenderModel>,
}

impl BroadcastPresenter {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderModel> {
        self.tx.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for BroadcastPresenter {
    fn render(&self, model: RenderModel) {
        // Err only means nobody is watching
        if self.tx.send(model).is_err() {
            tracing::trace!("No viewers connected, render model dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_state::DashboardState;
    use crate::domain::dashboard::Tab;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_render_reaches_every_viewer() {
        let presenter = Arc::new(BroadcastPresenter::new());
        let mut first = presenter.subscribe();
        let mut second = presenter.subscribe();
        assert_eq!(presenter.viewer_count(), 2);

        let service = DashboardService::new(Arc::new(DashboardState::new()), presenter.clone());
        service.select_tab(Tab::Therapy);

        assert_eq!(first.recv().await.unwrap().active_tab, Tab::Therapy);
        assert_eq!(second.recv().await.unwrap().active_tab, Tab::Therapy);
    }

    #[test]
    fn test_render_without_viewers_is_harmless() {
        let presenter = BroadcastPresenter::new();
        presenter.render(DashboardState::new().snapshot());
        assert_eq!(presenter.viewer_count(), 0);
    }
}
