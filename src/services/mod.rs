//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los
//! servicios combinan los repositorios de la hoja con las integraciones
//! externas (imágenes, email, tablero de trabajo).

pub mod admin_service;
pub mod cleanup_service;
pub mod message_service;
pub mod portal_service;

pub use admin_service::{AdminService, UploadedPhoto};
pub use cleanup_service::{CleanupItem, CleanupReport, CleanupService, CleanupStatus};
pub use message_service::MessageService;
pub use portal_service::{CredentialOutcome, PortalService, StageStatus};
