use serde::Serialize;

use crate::resumos::repo::Resumo;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub resumos: Resumo,
    pub caminho_salvo: String,
}
