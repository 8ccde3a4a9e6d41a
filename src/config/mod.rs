//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y el descriptor del
//! esquema de la hoja de cálculo.

pub mod environment;
pub mod sheet_schema;

pub use environment::*;
