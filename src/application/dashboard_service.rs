// Dashboard service - Mutation entry points that hand a fresh render model to the presenter
use crate::application::dashboard_state::DashboardState;
use crate::application::presenter::Presenter;
use crate::domain::dashboard::{RenderModel, Tab};
use crate::domain::error::AcquisitionError;
use crate::domain::metrics::DerivedMetrics;
use crate::domain::telemetry::TelemetrySample;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    state: Arc<DashboardState>,
    presenter: Arc<dyn Presenter>,
    /// Serialises snapshot + hand-off so the presenter sees models in state order.
    render_lock: Arc<Mutex<()>>,
}

impl DashboardService {
    pub fn new(state: Arc<DashboardState>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            state,
            presenter,
            render_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn snapshot(&self) -> RenderModel {
        self.state.snapshot()
    }

    /// Handle a tab click. Never waits on a poll, only on an in-progress hand-off.
    pub fn select_tab(&self, tab: Tab) -> RenderModel {
        self.state.select_tab(tab);
        tracing::debug!("Active tab set to {}", tab);
        self.render()
    }

    pub fn publish_reading(&self, sample: TelemetrySample, metrics: DerivedMetrics) {
        self.state.update_telemetry(sample, metrics);
        self.render();
    }

    /// Keep the last reading but flag it stale. Returns the consecutive failure count.
    pub fn publish_failure(&self, error: &AcquisitionError) -> u32 {
        let failures = self.state.record_failure(error);
        self.render();
        failures
    }

    fn render(&self) -> RenderModel {
        let _guard = self.render_lock.lock();
        let model = self.state.snapshot();
        self.presenter.render(model.clone());
        model
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingPresenter;
    use super::*;
    use crate::domain::metrics::{derive, ThresholdConfig};
    use crate::domain::telemetry::sample_fixture;

    fn service() -> (DashboardService, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        let service = DashboardService::new(Arc::new(DashboardState::new()), presenter.clone());
        (service, presenter)
    }

    #[test]
    fn test_select_tab_renders_once() {
        let (service, presenter) = service();

        let model = service.select_tab(Tab::Therapy);

        assert_eq!(model.active_tab, Tab::Therapy);
        assert_eq!(presenter.models(), vec![model]);
    }

    #[test]
    fn test_publish_reading_renders_new_pair() {
        let (service, presenter) = service();
        let sample = sample_fixture();
        let metrics = derive(&sample, &ThresholdConfig::default());

        service.publish_reading(sample.clone(), metrics.clone());

        let models = presenter.models();
        assert_eq!(models.len(), 1);
        let reading = models[0].reading.clone().unwrap();
        assert_eq!(reading.sample, sample);
        assert_eq!(reading.metrics, metrics);
    }

    #[test]
    fn test_tab_click_is_never_overtaken_by_older_model() {
        let sample = sample_fixture();
        let metrics = derive(&sample, &ThresholdConfig::default());

        for _ in 0..200 {
            let (service, presenter) = service();

            std::thread::scope(|scope| {
                scope.spawn(|| {
                    for _ in 0..2_000 {
                        service.publish_reading(sample.clone(), metrics.clone());
                    }
                });
                scope.spawn(|| {
                    service.select_tab(Tab::Health);
                });
            });

            let tabs: Vec<Tab> = presenter.models().iter().map(|m| m.active_tab).collect();
            let clicked = tabs.iter().position(|t| *t == Tab::Health).unwrap();
            assert!(
                tabs[clicked..].iter().all(|t| *t == Tab::Health),
                "a Controls model was presented after the Health click"
            );
        }
    }

    #[test]
    fn test_publish_failure_before_first_reading() {
        let (service, presenter) = service();

        let failures = service.publish_failure(&AcquisitionError::Malformed("bad frame".into()));

        assert_eq!(failures, 1);
        let model = presenter.models().pop().unwrap();
        assert!(model.stale);
        assert!(model.reading.is_none());
    }
}
