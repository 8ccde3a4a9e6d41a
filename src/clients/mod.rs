//! Clients - HTTP Clients for External APIs
//!
//! This module contains the collaborators the portal talks to: the
//! spreadsheet store, the image host, the email API and the workflow
//! board. Each sits behind a trait so demo mode and tests can swap in
//! in-memory versions.

pub mod cloudinary;
pub mod email;
pub mod google_sheets;
pub mod image_store;
pub mod memory_store;
pub mod monday;
pub mod tabular_store;

// Re-export main types for convenience
pub use cloudinary::CloudinaryClient;
pub use email::{EmailSender, LogEmailSender, ResendClient};
pub use google_sheets::GoogleSheetsClient;
pub use image_store::{extract_public_id, ImageStore, InMemoryImageStore};
pub use memory_store::InMemoryTabularStore;
pub use monday::{MondayClient, WorkflowBoard};
pub use tabular_store::TabularStore;
