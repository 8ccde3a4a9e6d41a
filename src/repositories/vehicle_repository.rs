//! Repositorio de vehículos
//!
//! Resolución de credenciales, unión con el perfil del cliente y filtro
//! de vehículos activos, todo sobre el almacén tabular.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::sheet_table::{auth_rows, SheetTable};
use crate::clients::TabularStore;
use crate::config::sheet_schema::{Field, AUTH_TAB, CUSTOMER_TAB};
use crate::models::{AuthRow, CustomerInfo, LifecycleTag, VehicleRecord};
use crate::utils::errors::AppResult;

/// Acceso a las pestañas de autenticación y de clientes
pub struct VehicleRepository {
    store: Arc<dyn TabularStore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    async fn load_auth_rows(&self) -> AppResult<Vec<AuthRow>> {
        let table = SheetTable::load(self.store.as_ref(), &AUTH_TAB).await?;
        Ok(auth_rows(&table))
    }

    /// Resolver credenciales: primera fila cuyo RO y token coinciden
    /// exactamente (recortados, distinguiendo mayúsculas)
    pub async fn resolve(&self, ro_number: &str, credential_token: &str) -> AppResult<Option<VehicleRecord>> {
        let ro_number = ro_number.trim();
        let credential_token = credential_token.trim();
        if ro_number.is_empty() || credential_token.is_empty() {
            return Ok(None);
        }

        let matched = self
            .load_auth_rows()
            .await?
            .into_iter()
            .find(|row| row.ro_number == ro_number && row.credential_token == credential_token);

        let Some(auth) = matched else {
            debug!("Credenciales sin coincidencia para RO {}", ro_number);
            return Ok(None);
        };

        let customer = self.lookup_by_ro(ro_number).await?;
        Ok(Some(VehicleRecord::assemble(auth, customer)))
    }

    /// ¿Hay una fila de autenticación para este RO?
    pub async fn exists(&self, ro_number: &str) -> AppResult<bool> {
        let ro_number = ro_number.trim();
        Ok(self
            .load_auth_rows()
            .await?
            .iter()
            .any(|row| row.ro_number == ro_number))
    }

    /// Datos descriptivos del cliente; vacíos si no hay fila para el RO
    pub async fn lookup_by_ro(&self, ro_number: &str) -> AppResult<CustomerInfo> {
        let table = SheetTable::load(self.store.as_ref(), &CUSTOMER_TAB).await?;
        if !table.columns.has(Field::RoNumber) {
            warn!("⚠️ La pestaña '{}' no tiene columna RO", CUSTOMER_TAB.tab);
            return Ok(CustomerInfo::default());
        }

        let ro_number = ro_number.trim();
        let info = table
            .data_rows()
            .find(|(_, row)| table.cell(row, Field::RoNumber) == ro_number)
            .map(|(_, row)| customer_from_row(&table, row))
            .unwrap_or_default();

        Ok(info)
    }

    /// Índice RO -> cliente en una sola lectura de la pestaña
    pub async fn load_customer_index(&self) -> AppResult<HashMap<String, CustomerInfo>> {
        let table = SheetTable::load(self.store.as_ref(), &CUSTOMER_TAB).await?;
        Ok(customer_index(&table))
    }

    /// Vehículos activos en el orden de la hoja, sin entregados ni leads
    pub async fn list_active(&self) -> AppResult<Vec<VehicleRecord>> {
        let (rows, index) = futures::try_join!(self.load_auth_rows(), self.load_customer_index())?;

        let vehicles = rows
            .into_iter()
            .filter(|row| !LifecycleTag::parse(&row.lifecycle_tag).is_excluded_from_active())
            .map(|row| {
                let customer = index.get(&row.ro_number).cloned().unwrap_or_default();
                VehicleRecord::assemble(row, customer)
            })
            .collect();

        Ok(vehicles)
    }
}

fn customer_from_row(table: &SheetTable, row: &[String]) -> CustomerInfo {
    CustomerInfo {
        client_name: table.cell(row, Field::ClientName).to_string(),
        vin: table.cell(row, Field::Vin).to_string(),
        insurance: table.cell(row, Field::Insurance).to_string(),
        claim_number: table.cell(row, Field::ClaimNumber).to_string(),
        vehicle_description: table.cell(row, Field::VehicleDescription).to_string(),
        phone: table.cell(row, Field::Phone).to_string(),
        email: table.cell(row, Field::Email).to_string(),
    }
}

/// Índice RO -> datos del cliente a partir de una sola lectura;
/// si un RO se repite gana la primera fila
fn customer_index(table: &SheetTable) -> HashMap<String, CustomerInfo> {
    let mut index = HashMap::new();
    if !table.columns.has(Field::RoNumber) {
        warn!("⚠️ La pestaña '{}' no tiene columna RO", CUSTOMER_TAB.tab);
        return index;
    }

    for (_, row) in table.data_rows() {
        let ro_number = table.cell(row, Field::RoNumber);
        if ro_number.is_empty() {
            continue;
        }
        index
            .entry(ro_number.to_string())
            .or_insert_with(|| customer_from_row(table, row));
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InMemoryTabularStore;

    async fn repository() -> VehicleRepository {
        let store = InMemoryTabularStore::new()
            .with_tab(
                "allvehiclesmonday",
                &[
                    &["RO", "Monday_Item_ID", "UPDATES", "GROUP"],
                    &["4355", "91234", "Paint in Progress", ""],
                    &["4356", "55555", "Ready", "delivered"],
                    &["4357", "77777", "", "Leads"],
                    &["4355", "91234", "Duplicate", ""],
                    &["4358", "88888", "Body Work", "in shop"],
                ],
            )
            .await
            .with_tab(
                "customer-info",
                &[
                    &["RO", "CUSTOMER", "VIN", "Phone Number"],
                    &["4355", "Jane Doe", "1HGCM82633A004352", "555-0100"],
                    &["4358", "John Roe", "2T1BURHE0JC000000"],
                ],
            )
            .await;
        VehicleRepository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolve_first_match_wins() {
        let repo = repository().await;
        let record = repo.resolve(" 4355 ", "91234 ").await.unwrap().unwrap();
        assert_eq!(record.status_text, "Paint in Progress");
        assert_eq!(record.client_name, "Jane Doe");
        assert_eq!(record.phone, "555-0100");
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive_and_exact() {
        let repo = repository().await;
        assert!(repo.resolve("4355", "9123").await.unwrap().is_none());
        assert!(repo.resolve("4355", "").await.unwrap().is_none());
        assert!(repo.resolve("43", "91234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists() {
        let repo = repository().await;
        assert!(repo.exists(" 4356").await.unwrap());
        assert!(!repo.exists("9999").await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_by_ro_without_match_is_empty() {
        let repo = repository().await;
        assert_eq!(repo.lookup_by_ro("9999").await.unwrap(), CustomerInfo::default());
        let partial = repo.lookup_by_ro("4358").await.unwrap();
        assert_eq!(partial.client_name, "John Roe");
        assert_eq!(partial.phone, "");
        assert_eq!(partial.insurance, "");
    }

    #[tokio::test]
    async fn test_list_active_excludes_terminal_and_leads() {
        let repo = repository().await;
        let active = repo.list_active().await.unwrap();
        let ros: Vec<&str> = active.iter().map(|v| v.ro_number.as_str()).collect();
        assert_eq!(ros, vec!["4355", "4355", "4358"]);
        assert_eq!(active[2].client_name, "John Roe");
    }

    #[tokio::test]
    async fn test_missing_required_auth_column_is_configuration_error() {
        let store = InMemoryTabularStore::new()
            .with_tab("allvehiclesmonday", &[&["RO", "UPDATES"], &["4355", "Paint"]])
            .await
            .with_tab("customer-info", &[&["RO", "CUSTOMER"]])
            .await;
        let repo = VehicleRepository::new(Arc::new(store));

        assert!(matches!(
            repo.resolve("4355", "91234").await,
            Err(crate::utils::errors::AppError::Configuration(_))
        ));
        assert!(matches!(
            repo.list_active().await,
            Err(crate::utils::errors::AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_auth_tab_is_configuration_error() {
        let repo = VehicleRepository::new(Arc::new(InMemoryTabularStore::new()));
        assert!(matches!(
            repo.resolve("4355", "91234").await,
            Err(crate::utils::errors::AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_customer_index_first_row_wins() {
        let rows = [["RO", "CUSTOMER"], ["1", "First"], ["1", "Second"], ["", "Nobody"]]
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        let table = SheetTable::from_rows(&CUSTOMER_TAB, rows).unwrap();
        let index = customer_index(&table);
        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].client_name, "First");
    }
}
