//! Cliente GraphQL para el tablero de Monday.com
//!
//! Solo se usa para reflejar los mensajes del cliente como updates del
//! item del vehículo. El item id es la misma credencial del portal.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::utils::errors::{AppError, AppResult};

const MONDAY_API_URL: &str = "https://api.monday.com/v2";
const MONDAY_API_VERSION: &str = "2024-01";

#[async_trait]
pub trait WorkflowBoard: Send + Sync {
    /// Crear un update (comentario) en un item
    async fn create_update(&self, item_id: &str, body: &str) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

pub struct MondayClient {
    client: Client,
    api_token: String,
}

impl MondayClient {
    pub fn new(api_token: String, timeout: std::time::Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_token })
    }
}

#[async_trait]
impl WorkflowBoard for MondayClient {
    async fn create_update(&self, item_id: &str, body: &str) -> AppResult<()> {
        let query = r#"
            mutation AddUpdate($itemId: ID!, $body: String!) {
              create_update(item_id: $itemId, body: $body) {
                id
              }
            }
        "#;

        let response = self
            .client
            .post(MONDAY_API_URL)
            .header("Authorization", &self.api_token)
            .header("API-Version", MONDAY_API_VERSION)
            .json(&json!({
                "query": query,
                "variables": { "itemId": item_id, "body": body },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ Monday.com API error: {}", status);
            return Err(AppError::ExternalApi(format!("Monday.com API error: {}", status)));
        }

        let parsed: GraphQlResponse = response.json().await?;
        if let Some(first) = parsed.errors.first() {
            error!("❌ Monday.com GraphQL errors: {}", first.message);
            return Err(AppError::ExternalApi(first.message.clone()));
        }

        info!("📝 Update creado en item {}", item_id);
        Ok(())
    }
}
