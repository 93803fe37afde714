// Dashboard state - the single mutable entity shared by the refresh loop and tab clicks
use crate::domain::dashboard::{Reading, RenderModel, Tab};
use crate::domain::error::AcquisitionError;
use crate::domain::metrics::DerivedMetrics;
use crate::domain::telemetry::TelemetrySample;
use chrono::Utc;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Inner {
    reading: Option<Reading>,
    active_tab: Tab,
    stale: bool,
    consecutive_failures: u32,
    last_error: Option<String>,
}

/// Latest reading plus UI selection.
///
/// Sample and metrics live together in one `Reading` that is replaced as a
/// whole, so readers can only ever observe a matching pair. The lock is never
/// held across an await point; tab selection and telemetry updates only
/// contend for the duration of a field swap.
#[derive(Debug, Default)]
pub struct DashboardState {
    inner: RwLock<Inner>,
}

impl DashboardState {
    /// Starts with no reading and the Controls tab active.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_telemetry(&self, sample: TelemetrySample, metrics: DerivedMetrics) {
        let reading = Reading {
            sample,
            metrics,
            acquired_at: Utc::now(),
        };

        let mut inner = self.inner.write();
        inner.reading = Some(reading);
        inner.stale = false;
        inner.consecutive_failures = 0;
        inner.last_error = None;
    }

    /// Mark the current reading stale. Returns the consecutive failure count.
    pub fn record_failure(&self, error: &AcquisitionError) -> u32 {
        let mut inner = self.inner.write();
        inner.stale = true;
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.last_error = Some(error.to_string());
        inner.consecutive_failures
    }

    pub fn select_tab(&self, tab: Tab) {
        self.inner.write().active_tab = tab;
    }

    pub fn snapshot(&self) -> RenderModel {
        let inner = self.inner.read();
        RenderModel {
            active_tab: inner.active_tab,
            reading: inner.reading.clone(),
            stale: inner.stale,
            last_updated: inner.reading.as_ref().map(|r| r.acquired_at),
            consecutive_failures: inner.consecutive_failures,
            last_error: inner.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{derive, ThresholdConfig};
    use crate::domain::telemetry::sample_fixture;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn sample_with_grip(grip: f64) -> TelemetrySample {
        TelemetrySample {
            grip_force_newtons: grip,
            // ties battery percent to the same counter so a mixed pair is detectable
            supply_voltage: 10.5 + (grip % 100.0) * 0.021,
            distance_current_meters: grip % 50.0,
            ..sample_fixture()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardState::new();
        let model = state.snapshot();

        assert_eq!(model.active_tab, Tab::Controls);
        assert!(model.reading.is_none());
        assert!(!model.stale);
        assert!(model.last_updated.is_none());
        assert_eq!(model.consecutive_failures, 0);
    }

    #[test]
    fn test_update_replaces_pair() {
        let state = DashboardState::new();
        let config = ThresholdConfig::default();
        let sample = sample_fixture();
        let metrics = derive(&sample, &config);

        state.update_telemetry(sample.clone(), metrics.clone());

        let reading = state.snapshot().reading.unwrap();
        assert_eq!(reading.sample, sample);
        assert_eq!(reading.metrics, metrics);
    }

    #[test]
    fn test_failure_marks_stale_and_success_clears() {
        let state = DashboardState::new();
        let config = ThresholdConfig::default();
        let sample = sample_fixture();
        state.update_telemetry(sample.clone(), derive(&sample, &config));

        let count = state.record_failure(&AcquisitionError::Disconnected("usb".into()));
        assert_eq!(count, 1);
        let count = state.record_failure(&AcquisitionError::Timeout(Duration::from_millis(250)));
        assert_eq!(count, 2);

        let model = state.snapshot();
        assert!(model.stale);
        assert_eq!(model.reading.unwrap().sample, sample);
        assert!(model.last_error.unwrap().contains("timed out"));

        state.update_telemetry(sample.clone(), derive(&sample, &config));
        let model = state.snapshot();
        assert!(!model.stale);
        assert_eq!(model.consecutive_failures, 0);
        assert!(model.last_error.is_none());
    }

    #[test]
    fn test_select_tab_idempotent() {
        let once = DashboardState::new();
        once.select_tab(Tab::Health);

        let twice = DashboardState::new();
        twice.select_tab(Tab::Health);
        twice.select_tab(Tab::Health);

        assert_eq!(once.snapshot(), twice.snapshot());
        assert_eq!(twice.snapshot().active_tab, Tab::Health);
    }

    #[test]
    fn test_select_tab_keeps_reading() {
        let state = DashboardState::new();
        let sample = sample_fixture();
        state.update_telemetry(sample.clone(), derive(&sample, &ThresholdConfig::default()));

        state.select_tab(Tab::Therapy);

        let model = state.snapshot();
        assert_eq!(model.active_tab, Tab::Therapy);
        assert_eq!(model.reading.unwrap().sample, sample);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let state = DashboardState::new();
        let config = ThresholdConfig::default();
        let first = sample_with_grip(1.0);
        state.update_telemetry(first.clone(), derive(&first, &config));

        let model = state.snapshot();
        let second = sample_with_grip(2.0);
        state.update_telemetry(second.clone(), derive(&second, &config));
        state.select_tab(Tab::Health);

        assert_eq!(model.reading.unwrap().sample, first);
        assert_eq!(model.active_tab, Tab::Controls);
    }

    #[test]
    fn test_concurrent_readers_never_see_mixed_pair() {
        let state = DashboardState::new();
        let config = ThresholdConfig::default();
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..20_000 {
                    let sample = sample_with_grip(i as f64);
                    let metrics = derive(&sample, &config);
                    state.update_telemetry(sample, metrics);
                }
                done.store(true, Ordering::Release);
            });

            scope.spawn(|| {
                let tabs = [Tab::Controls, Tab::Therapy, Tab::Health];
                let mut i = 0;
                while !done.load(Ordering::Acquire) {
                    state.select_tab(tabs[i % tabs.len()]);
                    i += 1;
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    while !done.load(Ordering::Acquire) {
                        if let Some(reading) = state.snapshot().reading {
                            assert_eq!(reading.metrics, derive(&reading.sample, &config));
                        }
                    }
                });
            }
        });

        let reading = state.snapshot().reading.unwrap();
        assert_eq!(reading.sample.grip_force_newtons, 19_999.0);
    }
}
