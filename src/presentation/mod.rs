// Presentation layer - HTTP surface for viewers and tab clicks
pub mod app_state;
pub mod handlers;
