//! Middleware del sistema
//!
//! Este módulo contiene el middleware de CORS y la comprobación de la
//! sesión de administración.

pub mod admin_session;
pub mod cors;

pub use admin_session::*;
pub use cors::*;
