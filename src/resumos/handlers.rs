use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    resumos::{dto::UploadResponse, repo::Resumo},
    state::AppState,
};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Allow-listed document types and their on-disk extensions.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
];

pub(crate) fn allowed_extension(content_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

#[derive(Debug)]
struct ResumoForm {
    titulo: String,
    curso: String,
    tags: String,
}

/// Presence check trims; the persisted values keep the form input as sent.
fn resumo_form(titulo: String, curso: String, tags: String) -> Result<ResumoForm, ApiError> {
    if titulo.trim().is_empty() || curso.trim().is_empty() {
        return Err(ApiError::Validation(
            "Título e curso são obrigatórios.".into(),
        ));
    }
    Ok(ResumoForm {
        titulo,
        curso,
        tags,
    })
}

/// POST /upload (multipart: resumo file, titulo, curso, optional tags).
///
/// A file with a non-allow-listed content type is dropped at intake, so the
/// handler cannot tell it apart from no file at all; both yield the same 400.
#[instrument(skip_all, fields(user_id = %user.0.sub))]
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut titulo = String::new();
    let mut curso = String::new();
    let mut tags = String::new();
    let mut file: Option<(&'static str, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Falha ao ler o formulário: {e}")))?
    {
        match field.name() {
            Some("resumo") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                match allowed_extension(&content_type) {
                    Some(ext) => {
                        let data = field.bytes().await.map_err(|e| {
                            ApiError::Validation(format!("Falha ao receber o arquivo: {e}"))
                        })?;
                        file = Some((ext, data));
                    }
                    None => {
                        warn!(%content_type, "upload with disallowed content type");
                        // Dropped without reading; surfaces as "no file".
                    }
                }
            }
            Some("titulo") => {
                titulo = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Falha ao ler o formulário: {e}")))?
            }
            Some("curso") => {
                curso = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Falha ao ler o formulário: {e}")))?
            }
            Some("tags") => {
                tags = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Falha ao ler o formulário: {e}")))?
            }
            _ => {}
        }
    }

    let Some((ext, data)) = file else {
        return Err(ApiError::Validation(
            "Nenhum arquivo enviado ou tipo de arquivo inválido (apenas PDF ou DOCX).".into(),
        ));
    };

    let form = resumo_form(titulo, curso, tags)?;

    let key = format!("{}.{}", Uuid::new_v4(), ext);
    let caminho_salvo = state
        .storage
        .save(&key, data)
        .await
        .map_err(ApiError::Internal)?;

    let resumo = Resumo::create(
        &state.db,
        user.0.sub,
        &form.titulo,
        &form.curso,
        &caminho_salvo,
        &form.tags,
    )
    .await
    .map_err(|e| ApiError::Internal(e.into()))?;

    info!(resumo_id = %resumo.id, arquivo = %caminho_salvo, "resumo uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Resumo enviado com sucesso!".into(),
            resumos: resumo,
            caminho_salvo,
        }),
    ))
}
