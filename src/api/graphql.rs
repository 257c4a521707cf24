use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE } };
use serde::{ de::DeserializeOwned, Deserialize, Serialize };
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::{ ApiError, ChatApi };
use crate::auth::AuthContext;
use crate::models::auth::AuthResponse;
use crate::models::chat::{ ChatResponse, StatusResponse, ThreadResponse, ThreadsResponse };

const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_MUTATION: &str = "\
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    success
    message
    user { id email username createdAt updatedAt }
    accessToken
    refreshToken
  }
}";

const REGISTER_MUTATION: &str = "\
mutation Register($email: String!, $username: String!, $password: String!) {
  register(email: $email, username: $username, password: $password) {
    success
    message
    user { id email username createdAt updatedAt }
    accessToken
    refreshToken
  }
}";

const LOGOUT_MUTATION: &str = "\
mutation Logout {
  logout {
    success
    message
  }
}";

const SEND_MESSAGE_MUTATION: &str = "\
mutation SendMessage($content: String!, $threadId: ID, $imageUrl: String) {
  sendMessage(content: $content, threadId: $threadId, imageUrl: $imageUrl) {
    success
    message
    threadId
    aiMessage
    usage { promptTokens completionTokens totalTokens }
  }
}";

const GET_THREADS_QUERY: &str = "\
query GetThreads($page: Int, $limit: Int) {
  threads(page: $page, limit: $limit) {
    success
    threads { id title latestMessage createdAt updatedAt }
    pageInfo { total page limit totalPages hasNextPage hasPreviousPage }
  }
}";

const GET_THREAD_QUERY: &str = "\
query GetThread($threadId: ID!) {
  thread(threadId: $threadId) {
    success
    thread {
      id
      title
      latestMessage
      messages { id threadId content sender imageUrl createdAt }
    }
  }
}";

const DELETE_THREAD_MUTATION: &str = "\
mutation DeleteThread($threadId: ID!) {
  deleteThread(threadId: $threadId) {
    success
    message
  }
}";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

fn accept(success: bool, message: &str, fallback: &str) -> Result<(), ApiError> {
    if success {
        return Ok(());
    }
    let message = if message.trim().is_empty() { fallback } else { message };
    Err(ApiError::Rejected(message.to_string()))
}

/// GraphQL-over-HTTP implementation of the protocol surface. Every request
/// carries the bearer credential currently held by the auth context;
/// anonymous requests go out without the header and fail server-side.
pub struct GraphQlChatApi {
    http: HttpClient,
    endpoint: String,
    auth: Arc<AuthContext>,
}

impl GraphQlChatApi {
    pub fn new(endpoint: String, auth: Arc<AuthContext>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            auth,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: serde_json::Value
    ) -> Result<T, ApiError> {
        let mut request = self.http
            .post(&self.endpoint)
            .json(&(GraphQlRequest { query, variables }));

        if let Some(token) = self.auth.bearer_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?.error_for_status()?;
        let body: GraphQlResponse<T> = response.json().await?;

        if let Some(err) = body.errors.into_iter().next() {
            debug!("GraphQL error: {}", err.message);
            return Err(ApiError::Rejected(err.message));
        }

        body.data.ok_or_else(|| ApiError::Malformed("reply carried no data".to_string()))
    }
}

#[async_trait]
impl ChatApi for GraphQlChatApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            login: AuthResponse,
        }

        let data: Data = self.execute(
            LOGIN_MUTATION,
            json!({ "email": email, "password": password })
        ).await?;
        accept(data.login.success, &data.login.message, "Login failed")?;
        Ok(data.login)
    }

    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str
    ) -> Result<AuthResponse, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            register: AuthResponse,
        }

        let data: Data = self.execute(
            REGISTER_MUTATION,
            json!({ "email": email, "username": username, "password": password })
        ).await?;
        accept(data.register.success, &data.register.message, "Registration failed")?;
        Ok(data.register)
    }

    async fn logout(&self) -> Result<StatusResponse, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            logout: StatusResponse,
        }

        let data: Data = self.execute(LOGOUT_MUTATION, json!({})).await?;
        accept(data.logout.success, &data.logout.message, "Logout failed")?;
        Ok(data.logout)
    }

    async fn send_message(
        &self,
        content: &str,
        thread_id: Option<&str>,
        image_url: Option<&str>
    ) -> Result<ChatResponse, ApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            send_message: ChatResponse,
        }

        let data: Data = self.execute(
            SEND_MESSAGE_MUTATION,
            json!({ "content": content, "threadId": thread_id, "imageUrl": image_url })
        ).await?;
        accept(data.send_message.success, &data.send_message.message, "Failed to send message")?;
        Ok(data.send_message)
    }

    async fn list_threads(
        &self,
        page: Option<u32>,
        limit: Option<u32>
    ) -> Result<ThreadsResponse, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            threads: ThreadsResponse,
        }

        let data: Data = self.execute(
            GET_THREADS_QUERY,
            json!({ "page": page, "limit": limit })
        ).await?;
        accept(data.threads.success, "", "Failed to fetch threads")?;
        Ok(data.threads)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<ThreadResponse, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            thread: ThreadResponse,
        }

        let data: Data = self.execute(GET_THREAD_QUERY, json!({ "threadId": thread_id })).await?;
        accept(data.thread.success, "", "Failed to fetch thread")?;
        Ok(data.thread)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<StatusResponse, ApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_thread: StatusResponse,
        }

        let data: Data = self.execute(
            DELETE_THREAD_MUTATION,
            json!({ "threadId": thread_id })
        ).await?;
        accept(data.delete_thread.success, &data.delete_thread.message, "Failed to delete thread")?;
        Ok(data.delete_thread)
    }
}
