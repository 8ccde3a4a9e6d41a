//! Servicio del portal del cliente
//!
//! Verificación de credenciales (RO + contraseña) y consulta del vehículo
//! y de su etapa. Un vehículo entregado ya no da acceso al portal.

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{VehicleRecord, GENERIC_STATUS_MESSAGE};
use crate::repositories::{StatusRepository, VehicleRepository};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult, ACCESS_CLOSED_MESSAGE, INVALID_CREDENTIALS_MESSAGE};

/// Resultado de comprobar un par RO / contraseña
#[derive(Debug)]
pub enum CredentialOutcome {
    Granted(Box<VehicleRecord>),
    AccessClosed,
    Invalid,
}

/// Etapa actual con su mensaje para el cliente
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageStatus {
    pub stage: String,
    pub message: String,
    /// `false` cuando se usa el mensaje genérico
    pub matched: bool,
}

pub struct PortalService {
    vehicles: VehicleRepository,
    statuses: StatusRepository,
}

impl PortalService {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: state.vehicles(),
            statuses: state.statuses(),
        }
    }

    pub async fn verify(&self, ro_number: &str, password: &str) -> AppResult<CredentialOutcome> {
        let Some(record) = self.vehicles.resolve(ro_number, password).await? else {
            debug!("Credenciales inválidas para RO {}", ro_number.trim());
            return Ok(CredentialOutcome::Invalid);
        };

        if record.lifecycle().is_terminal() {
            info!("🔒 Acceso cerrado para RO {} (entregado)", record.ro_number);
            return Ok(CredentialOutcome::AccessClosed);
        }

        Ok(CredentialOutcome::Granted(Box::new(record)))
    }

    /// Vehículo del cliente; `missing` decide el error cuando no hay coincidencia
    pub async fn authorize(
        &self,
        ro_number: &str,
        password: &str,
        missing: fn() -> AppError,
    ) -> AppResult<VehicleRecord> {
        match self.verify(ro_number, password).await? {
            CredentialOutcome::Granted(record) => Ok(*record),
            CredentialOutcome::AccessClosed => Err(AppError::AccessClosed(ACCESS_CLOSED_MESSAGE.to_string())),
            CredentialOutcome::Invalid => Err(missing()),
        }
    }

    pub async fn get_vehicle(&self, ro_number: &str, password: &str) -> AppResult<VehicleRecord> {
        self.authorize(ro_number, password, vehicle_not_found).await
    }

    pub async fn get_status(&self, ro_number: &str, password: &str) -> AppResult<StageStatus> {
        let record = self.authorize(ro_number, password, vehicle_not_found).await?;
        self.stage_for(&record.status_text).await
    }

    /// Mensaje de la etapa o el genérico si no hay uno configurado
    pub async fn stage_for(&self, status_text: &str) -> AppResult<StageStatus> {
        let stage = status_text.trim().to_string();
        let status = match self.statuses.message_for(&stage).await? {
            Some(entry) if !entry.portal_message.is_empty() => StageStatus {
                stage,
                message: entry.portal_message,
                matched: true,
            },
            _ => StageStatus {
                stage,
                message: GENERIC_STATUS_MESSAGE.to_string(),
                matched: false,
            },
        };
        Ok(status)
    }
}

fn vehicle_not_found() -> AppError {
    AppError::NotFound(INVALID_CREDENTIALS_MESSAGE.to_string())
}
