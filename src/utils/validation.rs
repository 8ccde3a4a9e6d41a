//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar datos de entrada
//! del portal (credenciales, fotos, parámetros de limpieza).

use validator::ValidationError;

/// Tipos de imagen aceptados para las fotos de progreso
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Tamaño máximo de una foto (5MB)
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Longitud mínima de un mensaje del cliente
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Periodo máximo de retención de fotos (100 años)
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar la longitud mínima del mensaje (ya recortado)
pub fn validate_message_body(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < MIN_MESSAGE_CHARS {
        let mut error = ValidationError::new("message_length");
        error.add_param("min".into(), &MIN_MESSAGE_CHARS);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar el mime type de una foto
pub fn is_valid_image_type(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&mime.as_str())
}

/// Validar el tamaño de una foto
pub fn is_valid_file_size(size: usize) -> bool {
    size <= MAX_PHOTO_BYTES
}

/// Parsear el parámetro `days` de la limpieza (1..=MAX_RETENTION_DAYS, 7 por defecto)
pub fn parse_retention_days(raw: Option<&str>, default_days: i64) -> Result<i64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default_days);
    };

    match raw.trim().parse::<i64>() {
        Ok(days) if is_valid_retention_days(days) => Ok(days),
        _ => {
            let mut error = ValidationError::new("days");
            error.add_param("value".into(), &raw.to_string());
            error.add_param("min".into(), &1);
            error.add_param("max".into(), &MAX_RETENTION_DAYS);
            Err(error)
        }
    }
}

pub fn is_valid_retention_days(days: i64) -> bool {
    (1..=MAX_RETENTION_DAYS).contains(&days)
}

/// Sanitizar el RO para usarlo como clave en el almacén de imágenes
pub fn sanitize_ro_for_key(ro_number: &str) -> String {
    ro_number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("4355").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_message_body() {
        assert!(validate_message_body("When will it be ready?").is_ok());
        assert!(validate_message_body("   short   ").is_err());
    }

    #[test]
    fn test_image_types() {
        assert!(is_valid_image_type("image/jpeg"));
        assert!(is_valid_image_type("IMAGE/PNG"));
        assert!(is_valid_image_type("image/webp"));
        assert!(!is_valid_image_type("image/gif"));
        assert!(!is_valid_image_type("application/pdf"));
    }

    #[test]
    fn test_file_size() {
        assert!(is_valid_file_size(MAX_PHOTO_BYTES));
        assert!(!is_valid_file_size(MAX_PHOTO_BYTES + 1));
    }

    #[test]
    fn test_parse_retention_days() {
        assert_eq!(parse_retention_days(None, 7).unwrap(), 7);
        assert_eq!(parse_retention_days(Some("14"), 7).unwrap(), 14);
        assert!(parse_retention_days(Some("0"), 7).is_err());
        assert!(parse_retention_days(Some("-3"), 7).is_err());
        assert!(parse_retention_days(Some("abc"), 7).is_err());
        assert_eq!(parse_retention_days(Some("36500"), 7).unwrap(), MAX_RETENTION_DAYS);
        assert!(parse_retention_days(Some("36501"), 7).is_err());
        assert!(parse_retention_days(Some("100000000"), 7).is_err());
        assert!(parse_retention_days(Some("9223372036854775807"), 7).is_err());
    }

    #[test]
    fn test_sanitize_ro_for_key() {
        assert_eq!(sanitize_ro_for_key("4355"), "4355");
        assert_eq!(sanitize_ro_for_key(" RO 12/A "), "RO-12-A");
    }
}
