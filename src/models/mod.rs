//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que se leen de la hoja de
//! cálculo y los datos de demostración.

pub mod demo_data;
pub mod status_message;
pub mod vehicle;

pub use status_message::*;
pub use vehicle::*;
