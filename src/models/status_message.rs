//! Mensajes por etapa de reparación

use serde::{Deserialize, Serialize};

/// Mensaje mostrado cuando la etapa no tiene texto configurado
pub const GENERIC_STATUS_MESSAGE: &str = "Your vehicle is being processed.";

/// Fila de la pestaña de mensajes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessageEntry {
    pub status_label: String,
    pub portal_message: String,
}
