use async_trait::async_trait;
use reqwest::{header, Client};

use crate::storage::{validate_key, BlobStore, StorageError, StorageResult, StoredBlob};

/// Object storage do Supabase (API REST `storage/v1`).
#[derive(Clone)]
pub struct SupabaseBlobStore {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseBlobStore {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<StoredBlob> {
        validate_key(key)?;

        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadFailed(format!("{}: {}", status, body)));
        }

        Ok(StoredBlob {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_storage_api_layout() {
        let store = SupabaseBlobStore::new("https://proj.supabase.co/", "key", "pdfs-croqui");
        assert_eq!(
            store.object_url("comprovantes/1-a.pdf"),
            "https://proj.supabase.co/storage/v1/object/pdfs-croqui/comprovantes/1-a.pdf"
        );
        assert_eq!(
            store.public_url("comprovantes/1-a.pdf"),
            "https://proj.supabase.co/storage/v1/object/public/pdfs-croqui/comprovantes/1-a.pdf"
        );
    }
}
