// Application layer - Capabilities, shared state and the refresh loop
pub mod dashboard_service;
pub mod dashboard_state;
pub mod presenter;
pub mod refresh_scheduler;
pub mod telemetry_source;
