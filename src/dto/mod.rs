//! DTOs de la API HTTP

pub mod admin_dto;
pub mod portal_dto;
pub mod response;

pub use admin_dto::*;
pub use portal_dto::*;
pub use response::ApiResponse;
