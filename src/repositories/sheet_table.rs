//! Lectura de pestañas con su descriptor de esquema

use tracing::{info, warn};

use crate::clients::TabularStore;
use crate::config::sheet_schema::{ColumnMap, Field, TabSchema, AUTH_TAB, CUSTOMER_TAB, STATUS_TAB};
use crate::models::AuthRow;
use crate::utils::errors::AppResult;

/// Una pestaña leída completa con sus columnas resueltas
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub columns: ColumnMap,
    rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub async fn load(store: &dyn TabularStore, schema: &TabSchema) -> AppResult<Self> {
        let rows = store.read_tab(schema.tab).await?;
        Self::from_rows(schema, rows)
    }

    pub fn from_rows(schema: &TabSchema, rows: Vec<Vec<String>>) -> AppResult<Self> {
        let columns = match rows.first() {
            Some(headers) => schema.resolve(headers)?,
            None => schema.resolve(&[])?,
        };
        Ok(Self { columns, rows })
    }

    /// Filas de datos con su número de fila en la hoja (la primera es la 2)
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }

    pub fn cell<'a>(&self, row: &'a [String], field: Field) -> &'a str {
        self.columns.cell(row, field)
    }
}

/// Filas de la tabla de autenticación en orden de la hoja; las filas sin RO se ignoran
pub fn auth_rows(table: &SheetTable) -> Vec<AuthRow> {
    table
        .data_rows()
        .filter_map(|(sheet_row, row)| {
            let ro_number = table.cell(row, Field::RoNumber);
            if ro_number.is_empty() {
                return None;
            }
            Some(AuthRow {
                sheet_row,
                ro_number: ro_number.to_string(),
                credential_token: table.cell(row, Field::CredentialToken).to_string(),
                lifecycle_tag: table.cell(row, Field::LifecycleTag).to_string(),
                status_text: table.cell(row, Field::StatusText).to_string(),
                photo_url: table.cell(row, Field::PhotoUrl).to_string(),
                photo_timestamp: table.cell(row, Field::PhotoTimestamp).to_string(),
            })
        })
        .collect()
}

/// Validar las tres pestañas al arrancar; falla si falta una columna requerida
pub async fn validate_schemas(store: &dyn TabularStore) -> AppResult<()> {
    for schema in [AUTH_TAB, CUSTOMER_TAB, STATUS_TAB] {
        let table = SheetTable::load(store, &schema).await?;
        let missing = schema.missing_optional(&table.columns);
        if missing.is_empty() {
            info!("✅ Pestaña '{}' validada", schema.tab);
        } else {
            warn!(
                "⚠️ Pestaña '{}' sin columnas opcionales: {:?}",
                schema.tab, missing
            );
        }
    }
    Ok(())
}
