//! Modelo de VehicleRecord
//!
//! Una orden de reparación tal como la ve el portal: identidad y ciclo de
//! vida de la tabla de autenticación, datos descriptivos del perfil del
//! cliente.

use serde::{Deserialize, Serialize};

/// Etiqueta de ciclo de vida, parseada sin distinguir mayúsculas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleTag {
    /// Sin etiqueta: vehículo en el taller
    Active,
    /// Entregado; el acceso del cliente está cerrado
    Terminal,
    /// Lead, todavía no es un trabajo activo
    NotYetActive,
    Other(String),
}

impl LifecycleTag {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "" => LifecycleTag::Active,
            "delivered" => LifecycleTag::Terminal,
            "leads" => LifecycleTag::NotYetActive,
            _ => LifecycleTag::Other(raw.trim().to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleTag::Terminal)
    }

    /// Excluido de la lista de vehículos activos
    pub fn is_excluded_from_active(&self) -> bool {
        matches!(self, LifecycleTag::Terminal | LifecycleTag::NotYetActive)
    }
}

/// Campos descriptivos de la pestaña de clientes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub client_name: String,
    pub vin: String,
    pub insurance: String,
    pub claim_number: String,
    pub vehicle_description: String,
    pub phone: String,
    pub email: String,
}

/// Fila de la tabla de autenticación
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthRow {
    /// Fila de la hoja (1-based, la 1 son los encabezados)
    pub sheet_row: usize,
    pub ro_number: String,
    pub credential_token: String,
    pub lifecycle_tag: String,
    pub status_text: String,
    pub photo_url: String,
    pub photo_timestamp: String,
}

/// Registro desnormalizado de una orden de reparación
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub ro_number: String,
    #[serde(skip_serializing)]
    pub credential_token: String,
    pub lifecycle_tag: String,
    pub status_text: String,
    pub photo_url: String,
    pub photo_timestamp: String,
    pub client_name: String,
    pub vin: String,
    pub insurance: String,
    pub claim_number: String,
    pub vehicle_description: String,
    pub phone: String,
    pub email: String,
}

impl VehicleRecord {
    /// Ensamblar: identidad, ciclo de vida y foto vienen de la tabla de
    /// autenticación; los campos descriptivos del perfil del cliente
    pub fn assemble(auth: AuthRow, customer: CustomerInfo) -> Self {
        Self {
            ro_number: auth.ro_number,
            credential_token: auth.credential_token,
            lifecycle_tag: auth.lifecycle_tag,
            status_text: auth.status_text,
            photo_url: auth.photo_url,
            photo_timestamp: auth.photo_timestamp,
            client_name: customer.client_name,
            vin: customer.vin,
            insurance: customer.insurance,
            claim_number: customer.claim_number,
            vehicle_description: customer.vehicle_description,
            phone: customer.phone,
            email: customer.email,
        }
    }

    pub fn lifecycle(&self) -> LifecycleTag {
        LifecycleTag::parse(&self.lifecycle_tag)
    }
}
