use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::dto::{ApiResponse, PasswordQuery, SendMessageRequest, VerifyRequest};
use crate::models::VehicleRecord;
use crate::services::{CredentialOutcome, MessageService, PortalService, StageStatus};
use crate::state::AppState;
use crate::utils::errors::{invalid_credentials_error, AppError, ACCESS_CLOSED_MESSAGE};

pub fn create_portal_router() -> Router<AppState> {
    Router::new()
        .route("/auth/verify", post(verify_credentials))
        .route("/vehicle/:ro_number", get(get_vehicle))
        .route("/status/:ro_number", get(get_status))
        .route("/messages/send", post(send_message))
}

async fn verify_credentials(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<ApiResponse<VehicleRecord>>, AppError> {
    request.validate()?;

    let service = PortalService::new(&state);
    match service.verify(&request.ro_number, &request.password).await? {
        CredentialOutcome::Granted(record) => Ok(Json(ApiResponse::success(*record))),
        CredentialOutcome::AccessClosed => Err(AppError::AccessClosed(ACCESS_CLOSED_MESSAGE.to_string())),
        CredentialOutcome::Invalid => Err(invalid_credentials_error()),
    }
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(ro_number): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<ApiResponse<VehicleRecord>>, AppError> {
    let service = PortalService::new(&state);
    let record = service.get_vehicle(&ro_number, &query.password).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn get_status(
    State(state): State<AppState>,
    Path(ro_number): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<ApiResponse<StageStatus>>, AppError> {
    let service = PortalService::new(&state);
    let status = service.get_status(&ro_number, &query.password).await?;
    Ok(Json(ApiResponse::success(status)))
}

async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    request.validate()?;

    let service = MessageService::new(&state);
    service
        .send(&request.ro_number, &request.password, &request.message)
        .await?;
    Ok(Json(ApiResponse::message("Message sent successfully")))
}
