// src/models/upload.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Descritor de um comprovante armazenado. A solicitação guarda apenas
/// `caminho`/`url` como texto.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArquivoEnviado {
    pub id: Uuid,
    #[schema(example = "escritura.pdf")]
    pub nome_original: String,
    #[schema(example = "1700000000000-escritura.pdf")]
    pub nome_arquivo: String,
    #[schema(example = "/uploads/1700000000000-escritura.pdf")]
    pub caminho: String,
    pub url: String,
    pub tamanho: u64,
    pub data_upload: DateTime<Utc>,
}

// Upload em JSON: conteúdo do PDF em base64
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Base64UploadPayload {
    #[validate(
        required(message = "Nome do arquivo e conteúdo são obrigatórios."),
        length(min = 1, message = "Nome do arquivo e conteúdo são obrigatórios.")
    )]
    #[schema(example = "escritura.pdf")]
    pub filename: Option<String>,

    #[validate(
        required(message = "Nome do arquivo e conteúdo são obrigatórios."),
        length(min = 1, message = "Nome do arquivo e conteúdo são obrigatórios.")
    )]
    #[schema(example = "JVBERi0xLjQK")]
    pub file_content: Option<String>,
}

/// Formulário multipart de `/api/upload` (só para a documentação).
#[derive(ToSchema)]
pub struct UploadForm {
    /// Arquivo PDF, no máximo 10MB
    #[schema(value_type = String, format = Binary)]
    pub pdf: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub mensagem: String,
    pub arquivo: ArquivoEnviado,
}
