use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Empty until the conversation is bound to a persisted thread.
    pub thread_id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub latest_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Populated only by the detail query.
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub ai_message: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadsResponse {
    pub success: bool,
    #[serde(default)]
    pub threads: Vec<Thread>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub success: bool,
    #[serde(default)]
    pub thread: Option<Thread>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_decodes_server_reply() {
        let raw = r#"{
            "success": true,
            "message": "ok",
            "threadId": "t1",
            "aiMessage": "Hello!",
            "usage": { "promptTokens": 12, "completionTokens": 8, "totalTokens": 20 }
        }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.thread_id.as_deref(), Some("t1"));
        assert_eq!(resp.ai_message.as_deref(), Some("Hello!"));
        assert_eq!(resp.usage.unwrap().total_tokens, 20);
    }

    #[test]
    fn rejection_without_payload_decodes() {
        let raw = r#"{ "success": false, "message": "rate limited" }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message, "rate limited");
        assert!(resp.thread_id.is_none());
        assert!(resp.ai_message.is_none());
    }

    #[test]
    fn thread_detail_carries_messages_in_order() {
        let raw = r#"{
            "id": "t1",
            "title": "greetings",
            "messages": [
                { "id": "m1", "threadId": "t1", "content": "Hi", "sender": "user", "createdAt": "2025-01-01T00:00:00.000Z" },
                { "id": "m2", "threadId": "t1", "content": "Hello!", "sender": "assistant", "createdAt": "2025-01-01T00:00:01.000Z" }
            ]
        }"#;
        let thread: Thread = serde_json::from_str(raw).unwrap();
        let messages = thread.messages.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert!(messages[0].image_url.is_none());
    }
}
