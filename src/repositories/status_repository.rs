use std::sync::Arc;

use super::sheet_table::SheetTable;
use crate::clients::TabularStore;
use crate::config::sheet_schema::{Field, STATUS_TAB};
use crate::models::StatusMessageEntry;
use crate::utils::errors::AppResult;

/// Catálogo de mensajes por etapa
pub struct StatusRepository {
    store: Arc<dyn TabularStore>,
}

impl StatusRepository {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// Buscar el mensaje de una etapa; coincidencia exacta sin distinguir
    /// mayúsculas tras recortar ambos lados
    pub async fn message_for(&self, status_text: &str) -> AppResult<Option<StatusMessageEntry>> {
        let wanted = status_text.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }

        let table = SheetTable::load(self.store.as_ref(), &STATUS_TAB).await?;
        let entry = table
            .data_rows()
            .find(|(_, row)| table.cell(row, Field::StatusLabel).to_lowercase() == wanted)
            .map(|(_, row)| StatusMessageEntry {
                status_label: table.cell(row, Field::StatusLabel).to_string(),
                portal_message: table.cell(row, Field::PortalMessage).to_string(),
            });

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InMemoryTabularStore;

    async fn repository() -> StatusRepository {
        let store = InMemoryTabularStore::new()
            .with_tab(
                "updatelist",
                &[
                    &["Status", "Portal"],
                    &["Ready", "Come pick it up"],
                    &["Paint in Progress", "Drying"],
                    &["Empty Message"],
                ],
            )
            .await;
        StatusRepository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_message_lookup_ignores_case_and_padding() {
        let repo = repository().await;
        for input in ["Ready", " ready ", "READY"] {
            let entry = repo.message_for(input).await.unwrap().unwrap();
            assert_eq!(entry.portal_message, "Come pick it up");
        }

        let paint = repo.message_for("paint in progress").await.unwrap().unwrap();
        assert_eq!(paint.status_label, "Paint in Progress");
    }

    #[tokio::test]
    async fn test_missing_portal_header_is_configuration_error() {
        let store = InMemoryTabularStore::new()
            .with_tab("updatelist", &[&["Status", "Message"], &["Ready", "Come pick it up"]])
            .await;
        let repo = StatusRepository::new(Arc::new(store));
        assert!(matches!(
            repo.message_for("Ready").await,
            Err(crate::utils::errors::AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_message_lookup_misses() {
        let repo = repository().await;
        assert!(repo.message_for("").await.unwrap().is_none());
        assert!(repo.message_for("Paint").await.unwrap().is_none());

        let empty = repo.message_for("empty message").await.unwrap().unwrap();
        assert_eq!(empty.portal_message, "");
    }
}
