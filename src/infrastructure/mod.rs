// Infrastructure layer - External dependencies and adapters
pub mod broadcast_presenter;
pub mod chunked_json;
pub mod config;
pub mod http_response;
pub mod http_source;
pub mod synthetic_source;
