//! Configuración de variables de entorno
//!
//! Este módulo construye la configuración del proceso una sola vez al
//! arrancar. Los componentes la reciben a través de `AppState`.

use std::env;
use std::time::Duration;

use crate::utils::errors::{configuration_error, AppResult};
use crate::utils::validation::{is_valid_retention_days, MAX_RETENTION_DAYS};

/// Credenciales de la cuenta de servicio de Google
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    pub spreadsheet_id: String,
    pub service_account_email: String,
    pub private_key: String,
}

/// Credenciales del almacén de imágenes
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

/// Configuración de email saliente
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from: String,
    pub shop_inbox: String,
}

/// Configuración del tablero de flujo de trabajo
#[derive(Debug, Clone)]
pub struct MondayConfig {
    pub api_token: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub demo_mode: bool,
    pub http_timeout: Duration,
    pub google_sheets: Option<GoogleSheetsConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    pub email: EmailConfig,
    pub monday: Option<MondayConfig>,
    pub admin_username: String,
    pub admin_password: String,
    pub cron_secret: Option<String>,
    pub photo_retention_days: i64,
    pub photo_columns_auto_provision: bool,
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno (llamar después de `dotenvy`)
    pub fn from_env() -> AppResult<Self> {
        let demo_mode = env_flag("DEMO_MODE", false);

        let google_sheets = match (
            optional("GOOGLE_SHEETS_ID"),
            optional("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            optional("GOOGLE_PRIVATE_KEY"),
        ) {
            (Some(spreadsheet_id), Some(service_account_email), Some(private_key)) => {
                Some(GoogleSheetsConfig {
                    spreadsheet_id,
                    service_account_email,
                    // Las claves en .env suelen venir con "\n" escapados
                    private_key: private_key.replace("\\n", "\n"),
                })
            }
            _ => None,
        };

        if google_sheets.is_none() && !demo_mode {
            return Err(configuration_error(
                "Google Sheets credentials not configured (GOOGLE_SHEETS_ID, GOOGLE_SERVICE_ACCOUNT_EMAIL, GOOGLE_PRIVATE_KEY)",
            ));
        }

        let cloudinary = match (
            optional("CLOUDINARY_CLOUD_NAME"),
            optional("CLOUDINARY_API_KEY"),
            optional("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                folder: optional("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|| "repair-portal/vehicles".to_string()),
            }),
            _ => None,
        };

        let (admin_username, admin_password) =
            match (optional("ADMIN_USERNAME"), optional("ADMIN_PASSWORD")) {
                (Some(user), Some(pass)) => (user, pass),
                _ if demo_mode => ("admin".to_string(), "demo-admin".to_string()),
                _ => {
                    return Err(configuration_error(
                        "ADMIN_USERNAME and ADMIN_PASSWORD must be set",
                    ))
                }
            };

        Ok(Self {
            port: parse_or("PORT", 3000)?,
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            demo_mode,
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 15)?),
            google_sheets,
            cloudinary,
            email: EmailConfig {
                api_key: optional("RESEND_API_KEY"),
                from: optional("EMAIL_FROM").unwrap_or_else(|| "portal@example.com".to_string()),
                shop_inbox: optional("EMAIL_TO").unwrap_or_else(|| "shop@example.com".to_string()),
            },
            monday: optional("MONDAY_API_TOKEN").map(|api_token| MondayConfig { api_token }),
            admin_username,
            admin_password,
            cron_secret: optional("CRON_SECRET"),
            photo_retention_days: retention_days()?,
            photo_columns_auto_provision: env_flag("PHOTO_COLUMNS_AUTO_PROVISION", true),
        })
    }

    /// Configuración mínima para demo y tests (sin servicios externos)
    pub fn demo() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            cors_origins: Vec::new(),
            demo_mode: true,
            http_timeout: Duration::from_secs(15),
            google_sheets: None,
            cloudinary: None,
            email: EmailConfig {
                api_key: None,
                from: "portal@example.com".to_string(),
                shop_inbox: "shop@example.com".to_string(),
            },
            monday: None,
            admin_username: "admin".to_string(),
            admin_password: "demo-admin".to_string(),
            cron_secret: None,
            photo_retention_days: 7,
            photo_columns_auto_provision: true,
        }
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    match optional(key) {
        Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}

fn retention_days() -> AppResult<i64> {
    let days = parse_or("PHOTO_RETENTION_DAYS", 7)?;
    if !is_valid_retention_days(days) {
        return Err(configuration_error(format!(
            "PHOTO_RETENTION_DAYS must be between 1 and {}",
            MAX_RETENTION_DAYS
        )));
    }
    Ok(days)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| configuration_error(format!("{} must be a valid number", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_config() {
        let config = EnvironmentConfig::demo();
        assert!(config.demo_mode);
        assert_eq!(config.photo_retention_days, 7);
        assert_eq!(config.server_url(), "127.0.0.1:3000");
    }
}
