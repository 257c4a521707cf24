use chrono::{ SecondsFormat, Utc };
use std::sync::{ Arc, Mutex };
use uuid::Uuid;

use crate::api::{ ApiError, ChatApi };
use crate::models::chat::{ Message, Sender, Thread, Usage };

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// What a resolved submit handed back: the assistant reply appended to the
/// session (if the service produced one) and the token usage of the
/// exchange.
#[derive(Clone, Debug, Default)]
pub struct Exchange {
    pub assistant: Option<Message>,
    pub usage: Option<Usage>,
}

#[derive(Default)]
struct SessionState {
    thread_id: Option<String>,
    messages: Vec<Message>,
    pending: usize,
}

/// One active conversation: the in-memory message list, the bound thread
/// identity and the in-flight send count. All state mutations happen in
/// short critical sections between suspension points, never across one, so
/// concurrent submits interleave only at the network boundary.
///
/// A session is never re-targeted: switching threads constructs a fresh
/// `ChatSession`, and late resolutions against a discarded session mutate
/// only that discarded instance.
pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// A fresh conversation with no bound thread; the first accepted
    /// exchange that returns a thread id binds it.
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Resume a persisted thread from its fetched detail.
    pub fn with_thread(api: Arc<dyn ChatApi>, thread: Thread) -> Self {
        let state = SessionState {
            thread_id: Some(thread.id),
            messages: thread.messages.unwrap_or_default(),
            pending: 0,
        };
        Self {
            api,
            state: Mutex::new(state),
        }
    }

    /// Send a message. The user message is appended optimistically before
    /// the network call and removed (by id, never by position) if the call
    /// fails. An accepted reply may bind the thread id (first writer wins;
    /// a later response never overwrites it) and append the assistant
    /// message.
    pub async fn submit(
        &self,
        content: &str,
        image_url: Option<String>
    ) -> Result<Exchange, ApiError> {
        let content = content.trim();
        // Same guard as the composer, repeated here against programmatic
        // misuse: nothing to send is a silent no-op.
        if content.is_empty() && image_url.is_none() {
            return Ok(Exchange::default());
        }

        let optimistic_id = new_message_id();
        let bound = {
            let mut state = self.state.lock().unwrap();
            let thread_id = state.thread_id.clone();
            state.messages.push(Message {
                id: optimistic_id.clone(),
                thread_id: thread_id.clone().unwrap_or_default(),
                content: content.to_string(),
                sender: Sender::User,
                image_url: image_url.clone(),
                created_at: now_iso(),
            });
            state.pending += 1;
            thread_id
        };

        let result = self.api.send_message(content, bound.as_deref(), image_url.as_deref()).await;

        let mut state = self.state.lock().unwrap();
        state.pending -= 1;
        match result {
            Ok(reply) => {
                if let Some(server_thread) = reply.thread_id.as_ref() {
                    if state.thread_id.is_none() {
                        state.thread_id = Some(server_thread.clone());
                    }
                }

                let assistant = match reply.ai_message {
                    Some(reply_content) => {
                        let message = Message {
                            id: new_message_id(),
                            thread_id: reply.thread_id
                                .clone()
                                .or_else(|| state.thread_id.clone())
                                .unwrap_or_default(),
                            content: reply_content,
                            sender: Sender::Assistant,
                            image_url: None,
                            created_at: now_iso(),
                        };
                        state.messages.push(message.clone());
                        Some(message)
                    }
                    None => None,
                };

                Ok(Exchange {
                    assistant,
                    usage: reply.usage,
                })
            }
            Err(err) => {
                state.messages.retain(|m| m.id != optimistic_id);
                Err(err)
            }
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn thread_id(&self) -> Option<String> {
        self.state.lock().unwrap().thread_id.clone()
    }

    /// Number of submits still waiting on the service.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Contents of the user's own messages, in insertion order; feeds the
    /// suggestion pool.
    pub fn user_contents(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .messages.iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.content.clone())
            .collect()
    }
}
