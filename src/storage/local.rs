use async_trait::async_trait;
use std::path::PathBuf;
use tokio::{fs, io::AsyncWriteExt};

use crate::storage::{validate_key, BlobStore, StorageError, StorageResult, StoredBlob};

/// Armazenamento em disco. Os arquivos são servidos em `<base_url>/<key>`.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub async fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Falha ao criar o diretório de uploads {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self {
            base_path,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, _content_type: &str, data: Vec<u8>) -> StorageResult<StoredBlob> {
        validate_key(key)?;
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // `create_new` falha se a chave já existe (equivalente a upsert = false)
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", key, e)))?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!(key, bytes = data.len(), "Arquivo gravado em disco");

        Ok(StoredBlob {
            key: key.to_string(),
            url: self.url_for(key),
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
