//! Middleware de sesión de administración
//!
//! La sesión del panel es solo un header (`x-admin-session`) que el
//! navegador envía tras el login. La limpieza de fotos acepta además el
//! secreto del cron (`x-cron-secret`).

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub const ADMIN_SESSION_HEADER: &str = "x-admin-session";
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub fn has_admin_session(headers: &HeaderMap) -> bool {
    header_value(headers, ADMIN_SESSION_HEADER).is_some()
}

/// El secreto solo cuenta si está configurado
pub fn has_cron_secret(headers: &HeaderMap, expected: Option<&str>) -> bool {
    match (header_value(headers, CRON_SECRET_HEADER), expected) {
        (Some(given), Some(expected)) => given == expected,
        _ => false,
    }
}

/// Exigir el header de sesión de administración
pub async fn require_admin_session(request: Request, next: Next) -> Result<Response, AppError> {
    if !has_admin_session(request.headers()) {
        debug!("Petición de admin sin sesión: {}", request.uri().path());
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }
    Ok(next.run(request).await)
}

/// Sesión de administración o secreto del cron
pub async fn require_admin_or_cron(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    if has_admin_session(headers) || has_cron_secret(headers, state.config.cron_secret.as_deref()) {
        return Ok(next.run(request).await);
    }
    Err(AppError::Unauthorized("Unauthorized".to_string()))
}
