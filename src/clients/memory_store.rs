//! Almacén tabular en memoria
//!
//! Usado en modo demo y en los tests. Se comporta como la hoja: las filas
//! pueden ser más cortas que la fila de encabezados y una escritura fuera
//! de rango extiende la tabla.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::tabular_store::TabularStore;
use crate::utils::errors::{configuration_error, AppResult};

#[derive(Default)]
pub struct InMemoryTabularStore {
    tabs: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemoryTabularStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reemplazar el contenido de una pestaña
    pub async fn set_tab(&self, tab: &str, rows: Vec<Vec<String>>) {
        self.tabs.write().await.insert(tab.to_string(), rows);
    }

    /// Constructor de conveniencia a partir de literales
    pub async fn with_tab(self, tab: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.set_tab(tab, rows).await;
        self
    }
}

#[async_trait]
impl TabularStore for InMemoryTabularStore {
    async fn read_tab(&self, tab: &str) -> AppResult<Vec<Vec<String>>> {
        self.tabs
            .read()
            .await
            .get(tab)
            .cloned()
            .ok_or_else(|| configuration_error(format!("Tab '{}' does not exist", tab)))
    }

    async fn write_cells(
        &self,
        tab: &str,
        row: usize,
        start_col: usize,
        values: &[String],
    ) -> AppResult<()> {
        if row == 0 {
            return Err(configuration_error("Sheet rows are 1-based"));
        }

        let mut tabs = self.tabs.write().await;
        let rows = tabs
            .get_mut(tab)
            .ok_or_else(|| configuration_error(format!("Tab '{}' does not exist", tab)))?;

        if rows.len() < row {
            rows.resize(row, Vec::new());
        }
        let target = &mut rows[row - 1];
        if target.len() < start_col + values.len() {
            target.resize(start_col + values.len(), String::new());
        }
        for (offset, value) in values.iter().enumerate() {
            target[start_col + offset] = value.clone();
        }
        Ok(())
    }
}
