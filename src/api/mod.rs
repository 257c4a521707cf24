mod graphql;

pub use graphql::GraphQlChatApi;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::AuthContext;
use crate::models::auth::AuthResponse;
use crate::models::chat::{ ChatResponse, StatusResponse, ThreadResponse, ThreadsResponse };

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered and refused the operation; carries the
    /// server-provided message.
    #[error("{0}")]
    Rejected(String),
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed server reply: {0}")]
    Malformed(String),
}

/// The remote protocol surface. Implementations resolve `success = false`
/// envelopes into `ApiError::Rejected`, so an `Ok` return is always an
/// accepted operation. Calls are independent: no caching, no deduplication,
/// no retries.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str
    ) -> Result<AuthResponse, ApiError>;

    async fn logout(&self) -> Result<StatusResponse, ApiError>;

    async fn send_message(
        &self,
        content: &str,
        thread_id: Option<&str>,
        image_url: Option<&str>
    ) -> Result<ChatResponse, ApiError>;

    async fn list_threads(
        &self,
        page: Option<u32>,
        limit: Option<u32>
    ) -> Result<ThreadsResponse, ApiError>;

    async fn get_thread(&self, thread_id: &str) -> Result<ThreadResponse, ApiError>;

    async fn delete_thread(&self, thread_id: &str) -> Result<StatusResponse, ApiError>;
}

pub fn new_client(
    endpoint: &str,
    auth: Arc<AuthContext>
) -> Result<Arc<dyn ChatApi>, ApiError> {
    let client = GraphQlChatApi::new(endpoint.to_string(), auth)?;
    Ok(Arc::new(client))
}
