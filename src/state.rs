//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los servicios externos se guardan detrás
//! de sus traits para poder usar almacenes en memoria en demo y tests.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{
    CloudinaryClient, EmailSender, GoogleSheetsClient, ImageStore, InMemoryImageStore, LogEmailSender,
    MondayClient, ResendClient, TabularStore, WorkflowBoard,
};
use crate::config::environment::EnvironmentConfig;
use crate::models::demo_data;
use crate::repositories::{PhotoRepository, StatusRepository, VehicleRepository};
use crate::utils::errors::{configuration_error, AppResult};

/// Carpeta por defecto de las fotos en el almacén de imágenes
pub const DEFAULT_PHOTO_FOLDER: &str = "repair-portal/vehicles";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub tabular: Arc<dyn TabularStore>,
    pub images: Arc<dyn ImageStore>,
    pub email: Arc<dyn EmailSender>,
    pub board: Option<Arc<dyn WorkflowBoard>>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        tabular: Arc<dyn TabularStore>,
        images: Arc<dyn ImageStore>,
        email: Arc<dyn EmailSender>,
        board: Option<Arc<dyn WorkflowBoard>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            tabular,
            images,
            email,
            board,
        }
    }

    /// Construir los clientes reales (o los de demo) a partir de la configuración
    pub async fn from_config(config: EnvironmentConfig) -> AppResult<Self> {
        let timeout = config.http_timeout;

        let tabular: Arc<dyn TabularStore> = match (&config.google_sheets, config.demo_mode) {
            (Some(sheets), _) => Arc::new(GoogleSheetsClient::new(sheets.clone(), timeout)?),
            (None, true) => {
                info!("🎭 Modo demo: hoja en memoria con datos de ejemplo");
                Arc::new(demo_data::seeded_store().await)
            }
            (None, false) => return Err(configuration_error("Google Sheets is not configured")),
        };

        let images: Arc<dyn ImageStore> = match (&config.cloudinary, config.demo_mode) {
            (Some(cloudinary), _) => Arc::new(CloudinaryClient::new(cloudinary.clone(), timeout)?),
            (None, true) => {
                info!("🎭 Modo demo: fotos guardadas en memoria");
                Arc::new(InMemoryImageStore::new())
            }
            (None, false) => return Err(configuration_error("Cloudinary is not configured")),
        };

        let email: Arc<dyn EmailSender> = match &config.email.api_key {
            Some(api_key) => Arc::new(ResendClient::new(api_key.clone(), config.email.from.clone(), timeout)?),
            None => {
                warn!("⚠️ RESEND_API_KEY no configurada, los emails solo se registran en el log");
                Arc::new(LogEmailSender)
            }
        };

        let board: Option<Arc<dyn WorkflowBoard>> = match &config.monday {
            Some(monday) => Some(Arc::new(MondayClient::new(monday.api_token.clone(), timeout)?)),
            None => {
                warn!("⚠️ MONDAY_API_TOKEN no configurado, los mensajes no se copiarán al tablero");
                None
            }
        };

        Ok(Self::new(config, tabular, images, email, board))
    }

    pub fn vehicles(&self) -> VehicleRepository {
        VehicleRepository::new(self.tabular.clone())
    }

    pub fn statuses(&self) -> StatusRepository {
        StatusRepository::new(self.tabular.clone())
    }

    pub fn photos(&self) -> PhotoRepository {
        PhotoRepository::new(self.tabular.clone(), self.config.photo_columns_auto_provision)
    }

    pub fn photo_folder(&self) -> &str {
        self.config
            .cloudinary
            .as_ref()
            .map(|c| c.folder.as_str())
            .unwrap_or(DEFAULT_PHOTO_FOLDER)
    }
}
