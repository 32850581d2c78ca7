//! Canned-response chat assistant.
//!
//! Replies come from a fixed keyword table after a simulated thinking delay.
//! There is no model behind it.

use crate::config::ChatConfig;
use crate::latency::{RequestGate, SimulatedLatency};
use crate::MarketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

edu_catalog::define_id!(MessageId);

pub const GREETING: &str =
    "Xin chào! Tôi là trợ lý AI. Tôi có thể giúp bạn tìm khoá học phù hợp. Bạn muốn học gì?";

const REPLIES: &[(&[&str], &str)] = &[
    (
        &["tiếng anh", "english"],
        "Tôi gợi ý khoá \"English for Beginners with Native Speakers\" - học tiếng Anh với người bản xứ, rất phù hợp cho người mới bắt đầu!",
    ),
    (
        &["lập trình", "programming"],
        "Bạn có thể tham khảo khoá \"Advanced JavaScript Programming\" hoặc \"Data Science with Python\". Cả hai đều rất chất lượng!",
    ),
    (
        &["marketing"],
        "Khoá \"Digital Marketing Masterclass\" sẽ giúp bạn nắm vững tất cả kỹ năng marketing cần thiết!",
    ),
    (
        &["design", "thiết kế"],
        "Tôi gợi ý \"Web Design with Figma\" - học thiết kế web chuyên nghiệp từ cơ bản đến nâng cao!",
    ),
];

const DEFAULT_REPLY: &str = "Dựa trên yêu cầu của bạn, tôi gợi ý bạn xem qua danh sách khoá học của chúng tôi. Bạn có thể sử dụng chức năng lọc để tìm khoá học phù hợp!";

/// Canned reply for a user message. First matching keyword group wins.
pub fn reply_for(query: &str) -> &'static str {
    let query = query.to_lowercase();
    REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
        .map_or(DEFAULT_REPLY, |(_, reply)| *reply)
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub message: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn user(message: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            message: message.into(),
            is_user: true,
            timestamp: Utc::now(),
        }
    }

    fn assistant(message: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            message: message.into(),
            is_user: false,
            timestamp: Utc::now(),
        }
    }

    fn greeting() -> Self {
        Self {
            id: MessageId::new("1"),
            ..Self::assistant(GREETING)
        }
    }
}

/// Conversation state shown by the chat widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub is_open: bool,
    pub messages: Vec<ChatMessage>,
    pub is_typing: bool,
    pub error: Option<String>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            is_open: false,
            messages: vec![ChatMessage::greeting()],
            is_typing: false,
            error: None,
        }
    }
}

/// The chat assistant session.
///
/// Overlapping sends each append their reply when they resolve. Unfenced, the
/// first reply to land clears the typing indicator; fenced, it stays up until
/// the newest request resolves.
pub struct Assistant {
    latency: SimulatedLatency,
    gate: RequestGate,
    state: watch::Sender<ChatState>,
}

impl Assistant {
    pub fn new(config: &ChatConfig) -> Self {
        let (state, _) = watch::channel(ChatState::default());
        Self {
            latency: SimulatedLatency::new(config.latency.clone()),
            gate: RequestGate::new(config.fence_stale_responses),
            state,
        }
    }

    pub fn toggle_open(&self) -> bool {
        let mut open = false;
        self.state.send_modify(|state| {
            state.is_open = !state.is_open;
            open = state.is_open;
        });
        open
    }

    /// Send a user message and wait for the reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`.
    pub async fn send_message(&self, text: &str) -> Result<Option<ChatMessage>, MarketError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let ticket = self.gate.begin();
        self.state.send_modify(|state| {
            state.messages.push(ChatMessage::user(text));
            state.is_typing = true;
            state.error = None;
        });
        debug!(request = ticket.id(), "chat message sent");

        let outcome = self.latency.wait().await;
        let typing = self.gate.is_fenced() && !self.gate.is_latest(ticket);

        match outcome {
            Ok(_) => {
                let reply = ChatMessage::assistant(reply_for(text));
                self.state.send_modify(|state| {
                    state.messages.push(reply.clone());
                    state.is_typing = typing;
                });
                Ok(Some(reply))
            }
            Err(_) => {
                warn!(request = ticket.id(), "chat reply failed");
                let err = MarketError::ChatUnavailable;
                self.state.send_modify(|state| {
                    state.is_typing = typing;
                    state.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    /// Back to just the greeting.
    pub fn clear_chat(&self) {
        self.state.send_modify(|state| {
            state.messages = vec![ChatMessage::greeting()];
            state.is_typing = false;
            state.error = None;
        });
    }

    /// Text of the most recent user message, for retrying.
    pub fn last_user_message(&self) -> Option<String> {
        self.state
            .borrow()
            .messages
            .iter()
            .rev()
            .find(|m| m.is_user)
            .map(|m| m.message.clone())
    }

    pub fn current(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }
}
