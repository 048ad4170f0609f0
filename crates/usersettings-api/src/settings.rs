// User settings API endpoints
//
// Every request gets its own RequestScope (inserted by `with_request_scope`),
// so repeated loads or identical writes while serving one request reach the
// store only once.

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use usersettings_core::{
    LlmSettings, RequestScope, Setting, SettingsError, SettingsMap, SettingsService,
};
use usersettings_storage::{create_db_settings_store, StorageBackend};
use utoipa::ToSchema;

use crate::common::ErrorResponse;
use crate::validation::{validate_setting_code, validate_user_id};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SettingsService>,
}

impl AppState {
    pub fn new(backend: StorageBackend) -> Self {
        let store = create_db_settings_store(backend);
        Self {
            service: Arc::new(SettingsService::new(Arc::new(store))),
        }
    }
}

/// Request to create or update a single setting
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingRequest {
    /// New value. Omit or send null to leave an existing value unchanged;
    /// a newly created setting then has no value.
    #[serde(default)]
    #[schema(example = "sk-...")]
    pub value: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn map_settings_error(err: SettingsError, action: &str) -> ApiError {
    match err {
        SettingsError::InvalidInput(msg) => {
            ErrorResponse::new(msg).into_response(StatusCode::BAD_REQUEST)
        }
        SettingsError::Storage(e) => {
            tracing::error!("Failed to {}: {:#}", action, e);
            ErrorResponse::internal()
        }
    }
}

/// Attach a fresh RequestScope to the request
pub async fn with_request_scope(mut req: Request, next: Next) -> Response {
    let scope = Arc::new(RequestScope::new());
    tracing::trace!(scope = %scope.id(), path = %req.uri().path(), "Request scope opened");
    req.extensions_mut().insert(scope);
    next.run(req).await
}

/// Get all settings of a user
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/settings",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Settings keyed by code", body = HashMap<String, String>),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsMap>, ApiError> {
    validate_user_id(&user_id).map_err(|e| map_settings_error(e, "validate request"))?;

    let settings = state
        .service
        .get_settings(Some(&scope), &user_id)
        .await
        .map_err(|e| map_settings_error(e, "load settings"))?;

    Ok(Json(settings))
}

/// Create or update one setting of a user
#[utoipa::path(
    put,
    path = "/v1/users/{user_id}/settings/{code}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("code" = String, Path, description = "Setting code")
    ),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting as persisted", body = Setting),
        (status = 400, description = "Invalid user ID or code", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Path((user_id, code)): Path<(String, String)>,
    Json(req): Json<UpdateSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    validate_user_id(&user_id)
        .and_then(|_| validate_setting_code(&code))
        .map_err(|e| map_settings_error(e, "validate request"))?;

    let setting = state
        .service
        .update_settings(Some(&scope), &user_id, &code, req.value.as_deref())
        .await
        .map_err(|e| map_settings_error(e, "update setting"))?;

    tracing::info!(user_id = %user_id, code = %code, "Setting updated");

    Ok(Json(setting))
}

/// Get the configured LLM providers of a user, in priority order
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/llm-settings",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Configured providers", body = LlmSettings),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_llm_settings(
    State(state): State<AppState>,
    Extension(scope): Extension<Arc<RequestScope>>,
    Path(user_id): Path<String>,
) -> Result<Json<LlmSettings>, ApiError> {
    validate_user_id(&user_id).map_err(|e| map_settings_error(e, "validate request"))?;

    let llm = state
        .service
        .get_llm_settings(Some(&scope), &user_id)
        .await
        .map_err(|e| map_settings_error(e, "load LLM settings"))?;

    Ok(Json(llm))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users/:user_id/settings", get(get_settings))
        .route("/v1/users/:user_id/settings/:code", put(update_setting))
        .route("/v1/users/:user_id/llm-settings", get(get_llm_settings))
        .layer(middleware::from_fn(with_request_scope))
        .with_state(state)
}
