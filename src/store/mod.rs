mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::cli::Args;
use log::info;
use std::sync::Arc;
use thiserror::Error;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential store parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key-value storage for the signed-in session. Implementations are
/// local and synchronous; every mutation is persisted before returning.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn create_credential_store(
    args: &Args
) -> Result<Arc<dyn CredentialStore>, Box<dyn std::error::Error + Send + Sync>> {
    match args.credential_store.to_lowercase().as_str() {
        "file" => {
            info!("Credentials will be stored in: {}", args.credential_path);
            let store = FileCredentialStore::new(args.credential_path.clone())?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryCredentialStore::new())),
        other =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported credential store type: {}", other)
                    )
                )
            ),
    }
}
