//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access closed: {0}")]
    AccessClosed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Hoja inaccesible o sin las columnas requeridas
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::ExternalApi(e.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                let mut body = ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                );
                body.details = Some(json!(e));
                (StatusCode::BAD_REQUEST, body)
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),
                )
            }

            AppError::AccessClosed(msg) => {
                warn!("Access closed: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("Access Closed", msg, "ACCESS_CLOSED"),
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
                )
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
                )
            }

            AppError::PayloadTooLarge(msg) => {
                warn!("Payload too large: {}", msg);
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ErrorResponse::new("Payload Too Large", msg, "PAYLOAD_TOO_LARGE"),
                )
            }

            AppError::Configuration(msg) => {
                error!("Configuration error: {}", msg);
                let mut body = ErrorResponse::new(
                    "Configuration Error",
                    "The data store is misconfigured or unreachable".to_string(),
                    "CONFIGURATION_ERROR",
                );
                body.details = Some(json!({ "configuration_error": msg }));
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }

            AppError::ExternalApi(msg) => {
                error!("External API error: {}", msg);
                let mut body = ErrorResponse::new(
                    "External API Error",
                    "An error occurred while communicating with external service".to_string(),
                    "EXTERNAL_API_ERROR",
                );
                body.details = Some(json!({ "external_api_error": msg }));
                (StatusCode::BAD_GATEWAY, body)
            }

            AppError::ServiceUnavailable(msg) => {
                error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Service Unavailable", msg, "SERVICE_UNAVAILABLE"),
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                let mut body = ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                );
                body.details = Some(json!({ "internal_error": msg }));
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Mensaje genérico de credenciales inválidas (no revela si falló el RO o la contraseña)
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid RO Number or password";

/// Mensaje para vehículos ya entregados
pub const ACCESS_CLOSED_MESSAGE: &str =
    "This repair order has been completed and portal access is closed. Please contact the shop.";

/// Función helper para credenciales inválidas
pub fn invalid_credentials_error() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para errores de configuración de la hoja
pub fn configuration_error(message: impl Into<String>) -> AppError {
    AppError::Configuration(message.into())
}
