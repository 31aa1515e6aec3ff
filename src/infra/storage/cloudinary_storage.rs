use crate::config::CloudinaryConfig;
use crate::domain::ports::BlobStorage;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{error, info};

/// Signed uploads to the Cloudinary image upload API.
pub struct CloudinaryStorage {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", self.config.cloud_name)
    }

    /// Parameters are signed in alphabetical order, joined with `&`, followed by the secret.
    fn sign(&self, timestamp: i64) -> String {
        let to_sign = format!("folder={}&timestamp={}{}", self.config.folder, timestamp, self.config.api_secret);
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[async_trait]
impl BlobStorage for CloudinaryStorage {
    async fn upload(&self, file_name: &str, content_type: &str, data: Vec<u8>) -> Result<String, AppError> {
        let timestamp = Utc::now().timestamp();

        let file_part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::Validation(format!("Invalid content type: {}", e)))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.config.folder.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", self.sign(timestamp));

        let res = self.client.post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Blob storage connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Blob storage upload failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: UploadResponse = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Unreadable blob storage response: {}", e)))?;

        info!("Uploaded {} to blob storage", file_name);
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_covers_folder_timestamp_and_secret() {
        let storage = CloudinaryStorage::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
            folder: "ImageAsserts".into(),
        });

        let expected = hex::encode(Sha256::digest(b"folder=ImageAsserts&timestamp=1700000000secret"));
        assert_eq!(storage.sign(1_700_000_000), expected);
        assert_eq!(storage.upload_url(), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }
}
