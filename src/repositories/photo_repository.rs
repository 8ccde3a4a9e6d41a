//! Ciclo de vida de las fotos de progreso
//!
//! La URL y la fecha de la foto viven en dos columnas de la pestaña de
//! autenticación (`PHOTO_URL`, `PHOTO_DATE`). Si la hoja todavía no las
//! tiene se añaden al final de la fila de encabezados.
//!
//! No hay bloqueo por RO: dos escrituras simultáneas sobre el mismo RO se
//! resuelven con la última que llega a la hoja.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::sheet_table::{auth_rows, SheetTable};
use crate::clients::TabularStore;
use crate::config::sheet_schema::{ColumnMap, Field, AUTH_TAB, PHOTO_DATE_HEADER, PHOTO_URL_HEADER};
use crate::models::LifecycleTag;
use crate::utils::errors::{bad_request_error, configuration_error, not_found_error, AppResult};

/// Foto de un vehículo entregado que superó el periodo de retención
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StalePhoto {
    pub ro_number: String,
    pub photo_url: String,
    pub photo_timestamp: String,
}

pub struct PhotoRepository {
    store: Arc<dyn TabularStore>,
    auto_provision: bool,
}

impl PhotoRepository {
    pub fn new(store: Arc<dyn TabularStore>, auto_provision: bool) -> Self {
        Self { store, auto_provision }
    }

    /// Comprobar (y si está permitido, crear) las columnas de fotos
    pub async fn ensure_photo_columns(&self) -> AppResult<()> {
        let table = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;
        self.provisioned_columns(table).await?;
        Ok(())
    }

    /// Guardar URL y fecha de la foto en la fila del RO
    pub async fn attach(&self, ro_number: &str, photo_url: &str, timestamp: &str) -> AppResult<()> {
        let ro_number = ro_number.trim();
        let table = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;
        let sheet_row = find_row(&table, ro_number).ok_or_else(|| not_found_error("Vehicle", ro_number))?;

        let columns = self.provisioned_columns(table).await?;
        let (url_col, date_col) = photo_columns(&columns)?;

        if date_col == url_col + 1 {
            self.store
                .write_cells(AUTH_TAB.tab, sheet_row, url_col, &[photo_url.to_string(), timestamp.to_string()])
                .await?;
        } else if url_col == date_col + 1 {
            self.store
                .write_cells(AUTH_TAB.tab, sheet_row, date_col, &[timestamp.to_string(), photo_url.to_string()])
                .await?;
        } else {
            self.store
                .write_cells(AUTH_TAB.tab, sheet_row, url_col, &[photo_url.to_string()])
                .await?;
            self.store
                .write_cells(AUTH_TAB.tab, sheet_row, date_col, &[timestamp.to_string()])
                .await?;
        }

        info!("📸 Foto registrada para RO {} (fila {})", ro_number, sheet_row);
        Ok(())
    }

    /// Vaciar URL y fecha de la foto; sin efecto si las columnas no existen
    pub async fn detach(&self, ro_number: &str) -> AppResult<()> {
        let ro_number = ro_number.trim();
        let table = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;
        let sheet_row = find_row(&table, ro_number).ok_or_else(|| not_found_error("Vehicle", ro_number))?;

        for field in [Field::PhotoUrl, Field::PhotoTimestamp] {
            match table.columns.index_of(field) {
                Some(col) => {
                    self.store
                        .write_cells(AUTH_TAB.tab, sheet_row, col, &[String::new()])
                        .await?
                }
                None => debug!("Columna {:?} ausente, nada que limpiar para RO {}", field, ro_number),
            }
        }

        info!("🧹 Foto desvinculada de RO {}", ro_number);
        Ok(())
    }

    pub async fn find_stale(&self, retention_days: i64) -> AppResult<Vec<StalePhoto>> {
        self.find_stale_at(retention_days, Utc::now()).await
    }

    /// Fotos de vehículos entregados con fecha estrictamente anterior a
    /// `now - retention_days`
    pub async fn find_stale_at(&self, retention_days: i64, now: DateTime<Utc>) -> AppResult<Vec<StalePhoto>> {
        let cutoff = Duration::try_days(retention_days)
            .and_then(|retention| now.checked_sub_signed(retention))
            .ok_or_else(|| bad_request_error("Invalid days parameter. Must be a positive number."))?;
        let table = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;

        let stale = auth_rows(&table)
            .into_iter()
            .filter(|row| LifecycleTag::parse(&row.lifecycle_tag).is_terminal())
            .filter(|row| !row.photo_url.is_empty() && !row.photo_timestamp.is_empty())
            .filter(|row| match parse_photo_timestamp(&row.photo_timestamp) {
                Some(taken_at) => taken_at < cutoff,
                None => {
                    warn!(
                        "⚠️ Fecha de foto ilegible para RO {}: '{}'",
                        row.ro_number, row.photo_timestamp
                    );
                    false
                }
            })
            .map(|row| StalePhoto {
                ro_number: row.ro_number,
                photo_url: row.photo_url,
                photo_timestamp: row.photo_timestamp,
            })
            .collect();

        Ok(stale)
    }

    /// Columnas resueltas tras añadir las de fotos que falten
    async fn provisioned_columns(&self, table: SheetTable) -> AppResult<ColumnMap> {
        let mut missing = Vec::new();
        if !table.columns.has(Field::PhotoUrl) {
            missing.push(PHOTO_URL_HEADER.to_string());
        }
        if !table.columns.has(Field::PhotoTimestamp) {
            missing.push(PHOTO_DATE_HEADER.to_string());
        }
        if missing.is_empty() {
            return Ok(table.columns);
        }

        if !self.auto_provision {
            return Err(configuration_error(format!(
                "Tab '{}' is missing photo columns {:?} and auto-provisioning is disabled",
                AUTH_TAB.tab, missing
            )));
        }

        self.store
            .append_headers(AUTH_TAB.tab, table.columns.width(), &missing)
            .await?;
        info!("🆕 Columnas {:?} añadidas a '{}'", missing, AUTH_TAB.tab);

        let reloaded = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;
        Ok(reloaded.columns)
    }
}

fn find_row(table: &SheetTable, ro_number: &str) -> Option<usize> {
    table
        .data_rows()
        .find(|(_, row)| table.cell(row, Field::RoNumber) == ro_number)
        .map(|(sheet_row, _)| sheet_row)
}

fn photo_columns(columns: &ColumnMap) -> AppResult<(usize, usize)> {
    match (columns.index_of(Field::PhotoUrl), columns.index_of(Field::PhotoTimestamp)) {
        (Some(url), Some(date)) => Ok((url, date)),
        _ => Err(configuration_error("Photo columns could not be resolved after provisioning")),
    }
}

/// RFC 3339, o `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DD` interpretados en UTC
pub fn parse_photo_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
