use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;
use validator::Validate;

use crate::dto::{
    AdminLoginRequest, ApiResponse, CleanupPreviewResponse, CleanupQuery, CleanupResponse, VehicleListResponse,
};
use crate::middleware::{require_admin_or_cron, require_admin_session};
use crate::services::{AdminService, CleanupService, UploadedPhoto};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError, AppResult};
use crate::utils::validation::{parse_retention_days, MAX_PHOTO_BYTES};

/// Margen sobre el tamaño máximo de la foto para los campos del formulario
const UPLOAD_BODY_LIMIT: usize = MAX_PHOTO_BYTES + 1024 * 1024;

pub fn create_admin_router(state: AppState) -> Router<AppState> {
    let session = || middleware::from_fn(require_admin_session);

    Router::new()
        .route("/auth", post(login))
        .route("/vehicles", get(list_vehicles).route_layer(session()))
        .route(
            "/upload-photo",
            post(upload_photo)
                .route_layer(session())
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/cleanup-photos",
            get(preview_cleanup)
                .route_layer(session())
                .merge(delete(run_cleanup).route_layer(middleware::from_fn_with_state(state, require_admin_or_cron))),
        )
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    request.validate()?;
    AdminService::new(&state).login(&request.username, &request.password)?;
    Ok(Json(ApiResponse::message("Authentication successful")))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<ApiResponse<VehicleListResponse>>, AppError> {
    let vehicles = AdminService::new(&state).list_vehicles().await?;
    Ok(Json(ApiResponse::success(vehicles.into())))
}

async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedPhoto>>, AppError> {
    let mut ro_number = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "roNumber" => {
                ro_number = Some(field.text().await.map_err(multipart_error)?);
            }
            "file" => {
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((mime_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (mime_type, bytes) = file.ok_or_else(|| bad_request_error("No file provided"))?;
    let ro_number = ro_number.ok_or_else(|| bad_request_error("RO Number is required"))?;

    let uploaded = AdminService::new(&state)
        .upload_photo(&ro_number, bytes, &mime_type)
        .await?;
    Ok(Json(ApiResponse::success_with_message(uploaded, "Photo uploaded successfully")))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large. Maximum size is 5MB.".to_string())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn retention_days(query: &CleanupQuery, state: &AppState) -> AppResult<i64> {
    parse_retention_days(query.days.as_deref(), state.config.photo_retention_days)
        .map_err(|_| bad_request_error("Invalid days parameter. Must be a positive number."))
}

async fn preview_cleanup(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<ApiResponse<CleanupPreviewResponse>>, AppError> {
    let days = retention_days(&query, &state)?;
    let vehicles = CleanupService::new(&state).preview(days).await?;
    Ok(Json(ApiResponse::success(CleanupPreviewResponse {
        days_old: days,
        count: vehicles.len(),
        vehicles,
    })))
}

async fn run_cleanup(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<ApiResponse<CleanupResponse>>, AppError> {
    let days = retention_days(&query, &state)?;
    info!("🧹 Limpieza de fotos de más de {} días", days);

    let report = CleanupService::new(&state).run_cleanup(days).await?;
    let message = if report.vehicles.is_empty() {
        "No old photos to clean up".to_string()
    } else {
        format!("Cleanup completed: {} deleted, {} failed", report.deleted, report.failed)
    };
    Ok(Json(ApiResponse::success_with_message(
        CleanupResponse { days_old: days, report },
        message,
    )))
}
