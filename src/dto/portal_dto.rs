use serde::Deserialize;
use validator::Validate;

// Credenciales del cliente
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub ro_number: String,
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub password: String,
}

// `?password=` en las rutas GET del vehículo
#[derive(Debug, Deserialize)]
pub struct PasswordQuery {
    #[serde(default)]
    pub password: String,
}

// Mensaje del cliente al taller
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub ro_number: String,
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub password: String,
    #[validate(custom = "crate::utils::validation::validate_message_body")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_request_validation() {
        let short: SendMessageRequest = serde_json::from_str(
            r#"{"roNumber":"4355","password":"91234","message":"  too short  "}"#,
        )
        .unwrap();
        assert!(short.validate().is_err());

        let ok: SendMessageRequest = serde_json::from_str(
            r#"{"roNumber":"4355","password":"91234","message":"Is my car ready yet?"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_verify_request_rejects_blank_fields() {
        let request: VerifyRequest =
            serde_json::from_str(r#"{"roNumber":"  ","password":"91234"}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
