// User Settings API Library
// Decision: Shared library for binaries (API server, OpenAPI export)

pub mod common;
pub mod config;
pub mod openapi;
pub mod settings;
pub mod validation;

pub use config::ApiConfig;
pub use settings::AppState;
