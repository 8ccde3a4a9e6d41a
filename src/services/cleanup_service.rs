//! Limpieza de fotos de vehículos entregados
//!
//! Borra la imagen del almacén y después vacía las columnas de la hoja.
//! Si el borrado de la imagen falla la hoja no se toca, así que volver a
//! ejecutar la limpieza reintenta ese vehículo.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::clients::{extract_public_id, ImageStore};
use crate::repositories::{PhotoRepository, StalePhoto};
use crate::state::AppState;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupStatus {
    Deleted,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupItem {
    pub ro_number: String,
    pub status: CleanupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resumen de una ejecución de limpieza
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
    pub vehicles: Vec<CleanupItem>,
}

impl CleanupReport {
    fn record_deleted(&mut self, ro_number: String) {
        self.deleted += 1;
        self.vehicles.push(CleanupItem {
            ro_number,
            status: CleanupStatus::Deleted,
            error: None,
        });
    }

    fn record_failed(&mut self, ro_number: String, error: String) {
        self.failed += 1;
        self.vehicles.push(CleanupItem {
            ro_number,
            status: CleanupStatus::Failed,
            error: Some(error),
        });
    }
}

pub struct CleanupService {
    photos: PhotoRepository,
    images: Arc<dyn ImageStore>,
}

impl CleanupService {
    pub fn new(state: &AppState) -> Self {
        Self {
            photos: state.photos(),
            images: state.images.clone(),
        }
    }

    /// Fotos que se borrarían, sin borrar nada
    pub async fn preview(&self, retention_days: i64) -> AppResult<Vec<StalePhoto>> {
        self.photos.find_stale(retention_days).await
    }

    /// Borrar las fotos caducadas; los fallos por vehículo van al informe
    pub async fn run_cleanup(&self, retention_days: i64) -> AppResult<CleanupReport> {
        let stale = self.photos.find_stale(retention_days).await?;
        let mut report = CleanupReport::default();

        if stale.is_empty() {
            info!("🧹 Sin fotos antiguas que limpiar ({} días)", retention_days);
            return Ok(report);
        }

        for photo in stale {
            let Some(public_id) = extract_public_id(&photo.photo_url) else {
                warn!("⚠️ No se pudo extraer el public_id de la URL del RO {}", photo.ro_number);
                report.record_failed(photo.ro_number, "Could not extract public_id from URL".to_string());
                continue;
            };

            if let Err(e) = self.images.delete(&public_id).await {
                error!("❌ Error borrando la imagen del RO {}: {}", photo.ro_number, e);
                report.record_failed(photo.ro_number, e.to_string());
                continue;
            }

            match self.photos.detach(&photo.ro_number).await {
                Ok(()) => {
                    info!("✅ Foto del RO {} eliminada", photo.ro_number);
                    report.record_deleted(photo.ro_number);
                }
                Err(e) => {
                    error!("❌ Error limpiando la hoja para el RO {}: {}", photo.ro_number, e);
                    report.record_failed(photo.ro_number, e.to_string());
                }
            }
        }

        info!(
            "🧹 Limpieza completada: {} borradas, {} fallidas",
            report.deleted, report.failed
        );
        Ok(report)
    }
}
