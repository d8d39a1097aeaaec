use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// Resumo metadata record. Created only through the authenticated upload
/// handler; never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resumo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub titulo: String,
    pub curso: String,
    pub arquivo: String,
    pub tags: String,
    #[serde(with = "time::serde::rfc3339")]
    pub criado_em: OffsetDateTime,
}

impl Resumo {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        titulo: &str,
        curso: &str,
        arquivo: &str,
        tags: &str,
    ) -> Result<Resumo, StoreError> {
        let resumo = sqlx::query_as::<_, Resumo>(
            r#"
            INSERT INTO resumos (user_id, titulo, curso, arquivo, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, titulo, curso, arquivo, tags, criado_em
            "#,
        )
        .bind(user_id)
        .bind(titulo)
        .bind(curso)
        .bind(arquivo)
        .bind(tags)
        .fetch_one(db)
        .await?;
        Ok(resumo)
    }
}
