//! Servicio del portal de administración
//!
//! Login del taller, listado de vehículos activos y subida de fotos de
//! progreso.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::clients::ImageStore;
use crate::models::VehicleRecord;
use crate::repositories::{PhotoRepository, VehicleRepository};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{is_valid_file_size, is_valid_image_type, sanitize_ro_for_key};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedPhoto {
    pub ro_number: String,
    pub photo_url: String,
    pub photo_date: String,
}

pub struct AdminService {
    vehicles: VehicleRepository,
    photos: PhotoRepository,
    images: Arc<dyn ImageStore>,
    folder: String,
    admin_username: String,
    admin_password: String,
}

impl AdminService {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: state.vehicles(),
            photos: state.photos(),
            images: state.images.clone(),
            folder: state.photo_folder().to_string(),
            admin_username: state.config.admin_username.clone(),
            admin_password: state.config.admin_password.clone(),
        }
    }

    /// Comparar las credenciales del taller (recortadas)
    pub fn login(&self, username: &str, password: &str) -> AppResult<()> {
        if username.trim() == self.admin_username && password.trim() == self.admin_password {
            info!("🔐 Login de administrador correcto");
            Ok(())
        } else {
            Err(AppError::Unauthorized("Invalid username or password".to_string()))
        }
    }

    /// Vehículos activos ordenados por RO numérico descendente
    pub async fn list_vehicles(&self) -> AppResult<Vec<VehicleRecord>> {
        let mut vehicles = self.vehicles.list_active().await?;
        vehicles.sort_by(|a, b| compare_ro_desc(&a.ro_number, &b.ro_number));
        Ok(vehicles)
    }

    /// Subir la foto y registrar su URL y fecha en la fila del RO
    pub async fn upload_photo(&self, ro_number: &str, bytes: Vec<u8>, mime_type: &str) -> AppResult<UploadedPhoto> {
        let ro_number = ro_number.trim();
        if ro_number.is_empty() {
            return Err(bad_request_error("RO Number is required"));
        }
        if bytes.is_empty() {
            return Err(bad_request_error("No file provided"));
        }
        if !is_valid_image_type(mime_type) {
            return Err(bad_request_error("Invalid file type. Only JPEG, PNG, and WebP are allowed."));
        }
        if !is_valid_file_size(bytes.len()) {
            return Err(AppError::PayloadTooLarge("File too large. Maximum size is 5MB.".to_string()));
        }

        // Comprobar el RO antes de subir nada
        if !self.vehicles.exists(ro_number).await? {
            return Err(not_found_error("Vehicle", ro_number));
        }

        let key = format!("RO-{}", sanitize_ro_for_key(ro_number));
        let photo_url = self
            .images
            .upload(bytes, &mime_type.trim().to_lowercase(), &self.folder, &key)
            .await
            .map_err(|e| {
                error!("❌ Error subiendo foto para RO {}: {}", ro_number, e);
                e
            })?;

        let photo_date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.photos.attach(ro_number, &photo_url, &photo_date).await?;

        Ok(UploadedPhoto {
            ro_number: ro_number.to_string(),
            photo_url,
            photo_date,
        })
    }
}

/// Orden descendente por valor numérico; los RO no numéricos van al final
fn compare_ro_desc(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
