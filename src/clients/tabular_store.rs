//! Almacén tabular remoto
//!
//! Abstracción sobre la hoja de cálculo: leer una pestaña completa y
//! escribir un rango de celdas en una fila. Sin transacciones.

use async_trait::async_trait;

use crate::utils::errors::AppResult;

#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Todas las filas de la pestaña; la primera es la de encabezados
    async fn read_tab(&self, tab: &str) -> AppResult<Vec<Vec<String>>>;

    /// Escribir `values` en la fila `row` (1-based, como la hoja) a partir
    /// de la columna `start_col` (0-based)
    async fn write_cells(
        &self,
        tab: &str,
        row: usize,
        start_col: usize,
        values: &[String],
    ) -> AppResult<()>;

    /// Añadir celdas de encabezado a la fila 1
    async fn append_headers(&self, tab: &str, start_col: usize, headers: &[String]) -> AppResult<()> {
        self.write_cells(tab, 1, start_col, headers).await
    }
}

/// Letra de columna A1 para un índice 0-based (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Rango A1 de `len` celdas en una fila
pub fn row_range(tab: &str, row: usize, start_col: usize, len: usize) -> String {
    let end_col = start_col + len.max(1) - 1;
    format!(
        "{}!{}{}:{}{}",
        tab,
        column_letter(start_col),
        row,
        column_letter(end_col),
        row
    )
}
