// src/services/upload_service.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::upload::{ArquivoEnviado, Base64UploadPayload},
    storage::{sanitize_filename, BlobStore},
};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn BlobStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Arquivo recebido via multipart (campo `pdf`).
    pub async fn store_multipart(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<ArquivoEnviado, AppError> {
        let is_pdf_mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().eq_ignore_ascii_case(PDF_MIME))
            .unwrap_or(false);
        if !is_pdf_mime {
            return Err(AppError::InvalidInput("Apenas arquivos PDF são permitidos.".to_string()));
        }
        check_pdf(&data)?;

        let nome_arquivo = format!("{}-{}", Utc::now().timestamp_millis(), sanitize_filename(filename));
        self.put(filename, nome_arquivo, data).await
    }

    /// Arquivo recebido como JSON com o conteúdo em base64.
    pub async fn store_base64(&self, payload: Base64UploadPayload) -> Result<ArquivoEnviado, AppError> {
        payload.validate()?;
        let (Some(filename), Some(file_content)) = (payload.filename, payload.file_content) else {
            return Err(AppError::InvalidInput(
                "Nome do arquivo e conteúdo são obrigatórios.".to_string(),
            ));
        };

        let data = decode_base64(&file_content)?;
        check_pdf(&data)?;

        let key = format!(
            "comprovantes/{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(&filename)
        );
        self.put(&filename, key, data).await
    }

    async fn put(&self, nome_original: &str, key: String, data: Vec<u8>) -> Result<ArquivoEnviado, AppError> {
        let tamanho = data.len() as u64;
        let stored = self.store.put(&key, PDF_MIME, data).await?;

        tracing::info!(
            backend = self.store.backend_name(),
            key = %stored.key,
            tamanho,
            "Comprovante armazenado"
        );

        let nome_arquivo = stored.key.rsplit('/').next().unwrap_or(&stored.key).to_string();
        Ok(ArquivoEnviado {
            id: Uuid::new_v4(),
            nome_original: nome_original.to_string(),
            nome_arquivo,
            caminho: stored.key,
            url: stored.url,
            tamanho,
            data_upload: Utc::now(),
        })
    }
}

// Aceita tanto o base64 puro quanto uma data URL (`data:application/pdf;base64,...`)
fn decode_base64(content: &str) -> Result<Vec<u8>, AppError> {
    let raw = match content.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => content,
    };
    let cleaned: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|_| AppError::InvalidInput("Conteúdo base64 inválido.".to_string()))
}

fn check_pdf(data: &[u8]) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::InvalidInput("Nenhum arquivo enviado.".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::InvalidInput(
            "Arquivo excede o tamanho máximo de 10MB.".to_string(),
        ));
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(AppError::InvalidInput("Apenas arquivos PDF são permitidos.".to_string()));
    }
    Ok(())
}
