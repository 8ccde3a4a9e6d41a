use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::VehicleRecord;
use crate::repositories::StalePhoto;
use crate::services::CleanupReport;

// Login del taller
#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub username: String,
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<VehicleRecord>,
    pub count: usize,
}

impl From<Vec<VehicleRecord>> for VehicleListResponse {
    fn from(vehicles: Vec<VehicleRecord>) -> Self {
        Self {
            count: vehicles.len(),
            vehicles,
        }
    }
}

// `?days=` de la limpieza; se valida a mano para aceptar texto arbitrario
#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreviewResponse {
    pub days_old: i64,
    pub count: usize,
    pub vehicles: Vec<StalePhoto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub days_old: i64,
    #[serde(flatten)]
    pub report: CleanupReport,
}
