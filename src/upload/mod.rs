mod cloudinary;

pub use cloudinary::CloudinaryHost;

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::{ Arc, Mutex };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// The external integration is not configured or reachable; reported
    /// before any upload is attempted.
    #[error("upload integration unavailable: {0}")]
    Unavailable(String),
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// What the media host hands back for an accepted upload.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadResult {
    pub url: String,
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Media-host account identifier; opaque, externally provisioned.
    pub cloud_name: String,
    /// Unsigned upload credential; opaque, externally provisioned.
    pub upload_preset: String,
    pub folder: String,
    pub max_file_bytes: u64,
    pub allowed_formats: Vec<String>,
    pub max_dimension: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            folder: "chat-bot".to_string(),
            max_file_bytes: 5_000_000,
            allowed_formats: ["png", "jpg", "jpeg", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_dimension: 2000,
        }
    }
}

/// Capability boundary to the external media host. Injected rather than
/// looked up ambiently; `is_available` must be checked before `upload`.
#[async_trait]
pub trait UploadHost: Send + Sync {
    fn is_available(&self) -> bool;
    async fn upload(&self, file: &Path) -> Result<UploadResult, UploadError>;
}

/// Composer-side attachment state: at most one uploaded-but-unsent image,
/// cleared when the message goes out or the user removes it.
pub struct UploadCoordinator {
    host: Arc<dyn UploadHost>,
    pending_image: Mutex<Option<String>>,
}

impl UploadCoordinator {
    pub fn new(host: Arc<dyn UploadHost>) -> Self {
        Self {
            host,
            pending_image: Mutex::new(None),
        }
    }

    pub async fn attach(&self, file: &Path) -> Result<UploadResult, UploadError> {
        if !self.host.is_available() {
            return Err(
                UploadError::Unavailable(
                    "media host is not configured; set the cloud name and upload preset".to_string()
                )
            );
        }
        let result = self.host.upload(file).await?;
        *self.pending_image.lock().unwrap() = Some(result.url.clone());
        Ok(result)
    }

    pub fn pending_image(&self) -> Option<String> {
        self.pending_image.lock().unwrap().clone()
    }

    /// Consumes the pending image for an outgoing message.
    pub fn take_image(&self) -> Option<String> {
        self.pending_image.lock().unwrap().take()
    }

    /// Explicit removal from the composer.
    pub fn discard_image(&self) {
        *self.pending_image.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnavailableHost;

    #[async_trait]
    impl UploadHost for UnavailableHost {
        fn is_available(&self) -> bool {
            false
        }

        async fn upload(&self, _file: &Path) -> Result<UploadResult, UploadError> {
            panic!("upload must not be attempted on an unavailable host");
        }
    }

    struct FixedHost;

    #[async_trait]
    impl UploadHost for FixedHost {
        fn is_available(&self) -> bool {
            true
        }

        async fn upload(&self, _file: &Path) -> Result<UploadResult, UploadError> {
            Ok(UploadResult {
                url: "https://media.example/abc.png".to_string(),
                public_id: "abc".to_string(),
                format: "png".to_string(),
                width: 640,
                height: 480,
            })
        }
    }

    #[tokio::test]
    async fn unavailable_host_fails_fast_without_uploading() {
        let coordinator = UploadCoordinator::new(Arc::new(UnavailableHost));
        let err = coordinator.attach(Path::new("photo.png")).await.unwrap_err();
        assert!(matches!(err, UploadError::Unavailable(_)));
        assert!(coordinator.pending_image().is_none());
    }

    #[tokio::test]
    async fn attached_image_is_consumed_on_send() {
        let coordinator = UploadCoordinator::new(Arc::new(FixedHost));
        let result = coordinator.attach(Path::new("photo.png")).await.unwrap();
        assert_eq!(result.public_id, "abc");
        assert_eq!(coordinator.pending_image().as_deref(), Some("https://media.example/abc.png"));

        let taken = coordinator.take_image();
        assert_eq!(taken.as_deref(), Some("https://media.example/abc.png"));
        assert!(coordinator.pending_image().is_none());
    }

    #[tokio::test]
    async fn discarded_image_is_not_sent() {
        let coordinator = UploadCoordinator::new(Arc::new(FixedHost));
        coordinator.attach(Path::new("photo.png")).await.unwrap();
        coordinator.discard_image();
        assert!(coordinator.take_image().is_none());
    }
}
