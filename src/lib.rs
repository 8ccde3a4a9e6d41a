//! Portal de estado de reparaciones
//!
//! Backend del portal del cliente (consulta de la etapa de reparación con
//! RO + contraseña) y del panel del taller (fotos de progreso y limpieza).
//! Los datos viven en una hoja de cálculo; las fotos en un almacén de
//! imágenes externo.

pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use middleware::cors::cors_middleware;
use state::AppState;

/// Router completo de la aplicación
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::create_portal_router())
        .nest("/admin", routes::create_admin_router(state.clone()));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
