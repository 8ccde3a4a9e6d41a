//! Mensajes del cliente al taller
//!
//! El email al taller es obligatorio; la copia en el tablero de trabajo
//! es best-effort y sus errores solo se registran.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{EmailSender, WorkflowBoard};
use crate::models::VehicleRecord;
use crate::services::portal_service::PortalService;
use crate::state::AppState;
use crate::utils::errors::{invalid_credentials_error, AppResult};

pub struct MessageService {
    portal: PortalService,
    email: Arc<dyn EmailSender>,
    board: Option<Arc<dyn WorkflowBoard>>,
    shop_inbox: String,
}

impl MessageService {
    pub fn new(state: &AppState) -> Self {
        Self {
            portal: PortalService::new(state),
            email: state.email.clone(),
            board: state.board.clone(),
            shop_inbox: state.config.email.shop_inbox.clone(),
        }
    }

    pub async fn send(&self, ro_number: &str, password: &str, message: &str) -> AppResult<()> {
        let vehicle = self
            .portal
            .authorize(ro_number, password, invalid_credentials_error)
            .await?;
        let message = message.trim();

        let subject = format!("Client Message - RO #{}", vehicle.ro_number);
        self.email
            .send(&self.shop_inbox, &subject, &render_message_email(&vehicle, message))
            .await?;
        info!("📩 Mensaje del RO {} enviado al taller", vehicle.ro_number);

        if let Some(board) = &self.board {
            let body = format!(
                "💬 Client message from {} (RO #{}):\n\n{}",
                vehicle.client_name, vehicle.ro_number, message
            );
            if let Err(e) = board.create_update(&vehicle.credential_token, &body).await {
                warn!("⚠️ No se pudo copiar el mensaje al tablero: {}", e);
            }
        }

        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_message_email(vehicle: &VehicleRecord, message: &str) -> String {
    let field = |label: &str, value: &str| {
        format!(
            r#"<p><strong>{}:</strong> {}</p>"#,
            label,
            escape_html(value)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <h2>New message from the client portal</h2>
  {}
  {}
  {}
  {}
  <div style="border-left: 4px solid #D32F2F; padding: 12px; margin-top: 16px;">
    <p>{}</p>
  </div>
</body>
</html>"#,
        field("Client", &vehicle.client_name),
        field("Email", &vehicle.email),
        field("RO Number", &vehicle.ro_number),
        field("VIN", &vehicle.vin),
        escape_html(message).replace('\n', "<br>")
    )
}
