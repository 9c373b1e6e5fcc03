//! Armazenamento dos comprovantes enviados.
//!
//! Os arquivos são endereçados por uma chave relativa (`comprovantes/<ts>-<nome>`
//! ou `<ts>-<nome>`). Arquivos enviados e nunca anexados a uma solicitação
//! continuam armazenados; não há limpeza de órfãos.

pub mod local;
pub mod supabase;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalBlobStore;
pub use supabase::SupabaseBlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Falha no upload: {0}")]
    UploadFailed(String),

    #[error("Chave de armazenamento inválida: {0}")]
    InvalidKey(String),

    #[error("Erro de IO: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de configuração: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Arquivo gravado: chave interna + URL pública.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Grava `data` sob `key`. Não sobrescreve um arquivo existente.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<StoredBlob>;

    /// Nome do backend, para logs.
    fn backend_name(&self) -> &'static str;
}

/// Troca tudo fora de `[A-Za-z0-9.-]` por `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();

    // Nomes só com pontos viram caminhos relativos; nunca aceitamos isso.
    if sanitized.chars().all(|c| c == '.') {
        return "arquivo.pdf".to_string();
    }
    sanitized
}

fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == ".." || part.is_empty()) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
