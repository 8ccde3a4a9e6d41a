//! Cliente HTTP para Cloudinary
//!
//! Subida y borrado de fotos con peticiones firmadas (SHA-1 de los
//! parámetros ordenados más el secreto de la API).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{error, info};

use super::image_store::ImageStore;
use crate::config::CloudinaryConfig;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig, timeout: std::time::Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.config.cloud_name, action
        )
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.config.api_secret)
    }
}

/// Firma: `k1=v1&k2=v2...` ordenado por clave, concatenado con el secreto
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(format!("{}{}", to_sign, api_secret).as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, folder: &str, key: &str) -> AppResult<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = vec![
            ("folder", folder.to_string()),
            ("overwrite", "true".to_string()),
            ("public_id", key.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.sign(&signed);
        let data_uri = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));

        let mut form: Vec<(&str, String)> = signed;
        form.push(("file", data_uri));
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));

        let response = self.client.post(self.endpoint("upload")).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Error subiendo imagen {}/{} ({}): {}", folder, key, status, body);
            return Err(AppError::ExternalApi(format!("Failed to upload image: {}", status)));
        }

        let uploaded: UploadResponse = response.json().await?;
        info!("📸 Imagen subida: {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = vec![
            ("invalidate", "true".to_string()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ];
        let signature = self.sign(&signed);

        let mut form: Vec<(&str, String)> = signed;
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));

        let response = self.client.post(self.endpoint("destroy")).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Error eliminando imagen {} ({}): {}", public_id, status, body);
            return Err(AppError::ExternalApi(format!("Failed to delete image: {}", status)));
        }

        let destroyed: DestroyResponse = response.json().await?;
        match destroyed.result.as_str() {
            "ok" => info!("🗑️ Imagen eliminada: {}", public_id),
            "not found" => info!(
                "Imagen {} no encontrada en Cloudinary (puede haber sido eliminada ya)",
                public_id
            ),
            other => {
                return Err(AppError::ExternalApi(format!(
                    "Unexpected destroy result for {}: {}",
                    public_id, other
                )))
            }
        }
        Ok(())
    }
}
