// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the User Settings API.
// It is used by both the API server (for Swagger UI)
// and the export-openapi binary (for static spec generation).

use crate::common::ErrorResponse;
use crate::settings;
use usersettings_core::{LlmProviderKind, LlmSettings, ProviderConfig, Setting};
use utoipa::OpenApi;

/// OpenAPI documentation for the User Settings API
#[derive(OpenApi)]
#[openapi(
    paths(
        settings::get_settings,
        settings::update_setting,
        settings::get_llm_settings,
    ),
    components(
        schemas(
            Setting,
            LlmSettings, ProviderConfig, LlmProviderKind,
            settings::UpdateSettingRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "settings", description = "User settings and LLM provider configuration")
    ),
    info(
        title = "User Settings API",
        version = "0.2.0",
        description = "API for reading and writing user-scoped settings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
