use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// Constraint backing the email-uniqueness invariant.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub criado_em: OffsetDateTime,
}

impl User {
    /// Find a user by email, exactly as stored (case-sensitive).
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, nome, email, senha_hash, criado_em
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with an already hashed password. A duplicate email
    /// surfaces as `StoreError::ConstraintViolation(EMAIL_UNIQUE_CONSTRAINT)`.
    pub async fn create(
        db: &PgPool,
        nome: &str,
        email: &str,
        senha_hash: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (nome, email, senha_hash)
            VALUES ($1, $2, $3)
            RETURNING id, nome, email, senha_hash, criado_em
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
