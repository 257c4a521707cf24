use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use reqwest::multipart::{ Form, Part };
use serde::Deserialize;
use std::path::Path;

use super::{ UploadConfig, UploadError, UploadHost, UploadResult };

#[derive(Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
    public_id: String,
    format: String,
    width: u32,
    height: u32,
}

/// Unsigned upload to the Cloudinary image endpoint. The configured
/// ceilings (file size, formats, pixel dimensions) are the host-side
/// acceptance rules and are applied here, before transmission.
pub struct CloudinaryHost {
    http: HttpClient,
    config: UploadConfig,
}

impl CloudinaryHost {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", self.config.cloud_name)
    }

    fn accept_file(&self, file: &Path, size: u64) -> Result<(), UploadError> {
        if size > self.config.max_file_bytes {
            return Err(
                UploadError::Rejected(
                    format!(
                        "file is {} bytes, above the {} byte ceiling",
                        size,
                        self.config.max_file_bytes
                    )
                )
            );
        }
        let extension = file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !self.config.allowed_formats.iter().any(|f| f == &extension) {
            return Err(
                UploadError::Rejected(
                    format!(
                        "format '{}' is not accepted (expected one of: {})",
                        extension,
                        self.config.allowed_formats.join(", ")
                    )
                )
            );
        }
        Ok(())
    }
}

#[async_trait]
impl UploadHost for CloudinaryHost {
    fn is_available(&self) -> bool {
        !self.config.cloud_name.is_empty() && !self.config.upload_preset.is_empty()
    }

    async fn upload(&self, file: &Path) -> Result<UploadResult, UploadError> {
        let bytes = tokio::fs::read(file).await?;
        self.accept_file(file, bytes.len() as u64)?;

        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone());

        let response = self.http
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let reply: CloudinaryUploadResponse = response.json().await?;
        if reply.width > self.config.max_dimension || reply.height > self.config.max_dimension {
            return Err(
                UploadError::Rejected(
                    format!(
                        "image is {}x{}, above the {} px ceiling",
                        reply.width,
                        reply.height,
                        self.config.max_dimension
                    )
                )
            );
        }

        info!("Uploaded {} as {}", file.display(), reply.public_id);
        Ok(UploadResult {
            url: reply.secure_url,
            public_id: reply.public_id,
            format: reply.format,
            width: reply.width,
            height: reply.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_host() -> CloudinaryHost {
        CloudinaryHost::new(UploadConfig {
            cloud_name: "demo".to_string(),
            upload_preset: "unsigned".to_string(),
            ..UploadConfig::default()
        })
    }

    #[test]
    fn availability_requires_both_credentials() {
        assert!(configured_host().is_available());
        assert!(!CloudinaryHost::new(UploadConfig::default()).is_available());
        assert!(
            !CloudinaryHost::new(UploadConfig {
                cloud_name: "demo".to_string(),
                ..UploadConfig::default()
            }).is_available()
        );
    }

    #[test]
    fn oversized_files_are_rejected_before_transmission() {
        let host = configured_host();
        let err = host.accept_file(Path::new("big.png"), 5_000_001).unwrap_err();
        assert!(matches!(err, UploadError::Rejected(_)));
        assert!(host.accept_file(Path::new("ok.png"), 5_000_000).is_ok());
    }

    #[test]
    fn unlisted_formats_are_rejected() {
        let host = configured_host();
        assert!(matches!(
            host.accept_file(Path::new("notes.txt"), 10).unwrap_err(),
            UploadError::Rejected(_)
        ));
        assert!(host.accept_file(Path::new("photo.JPG"), 10).is_ok());
    }

    #[test]
    fn host_response_decodes() {
        let raw = r#"{
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/chat-bot/abc.png",
            "public_id": "chat-bot/abc",
            "format": "png",
            "width": 640,
            "height": 480,
            "bytes": 12345
        }"#;
        let reply: CloudinaryUploadResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.public_id, "chat-bot/abc");
        assert_eq!(reply.width, 640);
    }
}
