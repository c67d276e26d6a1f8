use actix_web::{web, HttpResponse};

use crate::auth::Session;
use crate::errors::AppError;
use crate::settings::{Settings, SettingsStore};

/// GET /settings
///
/// Re-reads the document from disk on every call so external edits are
/// picked up without a restart.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current settings", body = Settings),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Settings file unreadable"),
    ),
    tag = "settings"
)]
pub async fn get_settings(
    store: web::Data<SettingsStore>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let settings = store
        .load()
        .map_err(|e| AppError::Internal(format!("failed to read settings: {}", e)))?;
    Ok(HttpResponse::Ok().json(settings))
}

/// PUT /settings
///
/// Replaces the whole document; there is no partial patching.
#[utoipa::path(
    put,
    path = "/settings",
    request_body = Settings,
    responses(
        (status = 200, description = "Persisted settings", body = Settings),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Settings file unwritable"),
    ),
    tag = "settings"
)]
pub async fn put_settings(
    store: web::Data<SettingsStore>,
    body: web::Json<Settings>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let settings = body.into_inner();
    store
        .save(&settings)
        .map_err(|e| AppError::Internal(format!("failed to write settings: {}", e)))?;
    Ok(HttpResponse::Ok().json(settings))
}
