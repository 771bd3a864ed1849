use crate::domain::model::UploadReceipt;
use crate::domain::ports::BlobStore;
use crate::utils::error::{LiveNftError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

/// Uploads image blobs to the SDK's IPFS-compatible endpoint.
pub struct IpfsUploader {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    cid: String,
}

impl IpfsUploader {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for IpfsUploader {
    async fn upload(&self, file: Vec<u8>, file_name: &str) -> Result<UploadReceipt> {
        let url = format!("{}/v1/ipfs/upload-file", self.base_url);
        tracing::debug!("Uploading {} bytes to {}", file.len(), url);

        let form = Form::new().part(
            "file",
            Part::bytes(file)
                .file_name(file_name.to_string())
                .mime_str("image/png")?,
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LiveNftError::UploadError {
                message: format!("Upload endpoint returned {}: {}", status, body),
            });
        }

        let payload: UploadResponse = response.json().await?;
        if payload.cid.trim().is_empty() {
            return Err(LiveNftError::UploadError {
                message: "Upload response has an empty cid".to_string(),
            });
        }

        tracing::debug!("Upload complete, cid: {}", payload.cid);
        Ok(UploadReceipt { cid: payload.cid })
    }
}
