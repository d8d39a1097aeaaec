use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for user registration. Fields default to empty so presence
/// is checked by the handler (400) instead of the JSON extractor (422).
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

/// User fields returned after registration. The password hash never leaves
/// the server.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub criado_em: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user_id_logado: Uuid,
    pub email_logado: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn registered_user_serializes_without_hash_field() {
        let response = RegisterResponse {
            message: "Usuário cadastrado com sucesso!".into(),
            user: RegisteredUser {
                id: Uuid::new_v4(),
                nome: "Ana".into(),
                email: "ana@x.com".into(),
                criado_em: datetime!(2025-01-02 03:04:05 UTC),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ana@x.com"));
        assert!(json.contains("2025-01-02T03:04:05Z"));
        assert!(!json.contains("senha"));
    }

    #[test]
    fn register_request_defaults_missing_fields_to_empty() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"nome":"Ana","email":"ana@x.com"}"#).unwrap();
        assert_eq!(req.nome, "Ana");
        assert!(req.senha.is_empty());
    }
}
