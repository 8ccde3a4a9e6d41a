//! Envío de emails
//!
//! Resend en producción; en modo demo los mensajes solo se registran.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::utils::errors::{AppError, AppResult};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

pub struct ResendClient {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendClient {
    pub fn new(api_key: String, from: String, timeout: std::time::Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_key, from })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Error enviando email ({}): {}", status, body);
            return Err(AppError::ExternalApi(format!("Email API error: {}", status)));
        }

        let sent: ResendResponse = response.json().await?;
        info!("📧 Email enviado a {} (id: {})", to, sent.id);
        Ok(())
    }
}

/// Sender que solo registra el mensaje
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        info!(
            "📧 [demo] Email para {} con asunto '{}' ({} bytes)",
            to,
            subject,
            html.len()
        );
        Ok(())
    }
}
