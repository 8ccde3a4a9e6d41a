//! Cliente HTTP para Google Sheets (API v4)
//!
//! Autenticación con cuenta de servicio: se firma un JWT RS256, se cambia
//! por un access token de OAuth y se guarda en memoria hasta un minuto
//! antes de que expire.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::tabular_store::{row_range, TabularStore};
use crate::config::GoogleSheetsConfig;
use crate::utils::errors::{configuration_error, AppError, AppResult};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Claims del JWT de la cuenta de servicio
#[derive(Debug, Serialize)]
struct ServiceAccountClaims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Access token cacheado
#[derive(Clone, Debug)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + Duration::seconds(60) < self.expires_at
    }
}

pub struct GoogleSheetsClient {
    client: Client,
    config: GoogleSheetsConfig,
    encoding_key: EncodingKey,
    token: RwLock<Option<CachedToken>>,
}

impl GoogleSheetsClient {
    /// Crear nuevo cliente con timeout explícito
    pub fn new(config: GoogleSheetsConfig, timeout: std::time::Duration) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| configuration_error(format!("Invalid GOOGLE_PRIVATE_KEY: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            encoding_key,
            token: RwLock::new(None),
        })
    }

    /// Obtener un access token válido (cacheado o nuevo)
    async fn access_token(&self) -> AppResult<String> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Otra tarea pudo refrescarlo mientras esperábamos el lock
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        debug!("🔑 Solicitando nuevo access token de Google");
        let now = Utc::now();
        let claims = ServiceAccountClaims {
            iss: self.config.service_account_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: TOKEN_URL.to_string(),
            exp: (now + Duration::minutes(60)).timestamp(),
            iat: now.timestamp(),
        };

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| configuration_error(format!("Error signing service account JWT: {}", e)))?;

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Google OAuth rechazó la cuenta de servicio ({}): {}", status, body);
            return Err(configuration_error(format!(
                "Google OAuth token exchange failed: {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await?;
        let cached = CachedToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        let access_token = cached.token.clone();
        *guard = Some(cached);

        info!("✅ Access token de Google renovado");
        Ok(access_token)
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            SHEETS_BASE_URL,
            self.config.spreadsheet_id,
            urlencoding::encode(range)
        )
    }
}

/// Las celdas llegan como valores formateados; cualquier otro tipo se pasa a texto
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TabularStore for GoogleSheetsClient {
    async fn read_tab(&self, tab: &str) -> AppResult<Vec<Vec<String>>> {
        let token = self.access_token().await?;
        let range = format!("{}!A:ZZ", tab);

        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Error leyendo pestaña '{}' ({}): {}", tab, status, body);
            return Err(match status.as_u16() {
                400 | 403 | 404 => configuration_error(format!(
                    "Tab '{}' is not readable: {}",
                    tab, status
                )),
                _ => AppError::ExternalApi(format!("Google Sheets read failed: {}", status)),
            });
        }

        let range: ValueRange = response.json().await?;
        let rows: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        debug!("📥 Pestaña '{}': {} filas", tab, rows.len());
        Ok(rows)
    }

    async fn write_cells(
        &self,
        tab: &str,
        row: usize,
        start_col: usize,
        values: &[String],
    ) -> AppResult<()> {
        let token = self.access_token().await?;
        let range = row_range(tab, row, start_col, values.len());

        let response = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [values],
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Error escribiendo rango '{}' ({}): {}", range, status, body);
            return Err(AppError::ExternalApi(format!(
                "Google Sheets write failed: {}",
                status
            )));
        }

        debug!("📤 Rango '{}' actualizado", range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(json!("4355")), "4355");
        assert_eq!(cell_to_string(json!(91234)), "91234");
        assert_eq!(cell_to_string(serde_json::Value::Null), "");
        assert_eq!(cell_to_string(json!(true)), "true");
    }

    #[test]
    fn test_invalid_private_key_is_configuration_error() {
        let config = GoogleSheetsConfig {
            spreadsheet_id: "sheet".to_string(),
            service_account_email: "svc@example.iam.gserviceaccount.com".to_string(),
            private_key: "not a pem".to_string(),
        };
        let result = GoogleSheetsClient::new(config, std::time::Duration::from_secs(5));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_cached_token_freshness() {
        let fresh = CachedToken {
            token: "t".to_string(),
            expires_at: Utc::now() + Duration::minutes(30),
        };
        let stale = CachedToken {
            token: "t".to_string(),
            expires_at: Utc::now() + Duration::seconds(30),
        };
        assert!(fresh.is_fresh());
        assert!(!stale.is_fresh());
    }
}
