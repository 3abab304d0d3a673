//! Request and response bodies exchanged with the backend.

use crate::types::{ChatMessage, ChatSummary, User};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Body of `/api/login` and `/api/register` successes.
///
/// Depending on the deployment either `token` + `user` or
/// `requiresVerification` is present.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "requiresVerification")]
    pub requires_verification: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatsResponse {
    pub chats: Vec<ChatSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateChatRequest<'a> {
    pub title: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreatedChat {
    pub chat_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatDetail {
    #[serde(default)]
    pub chat: Option<ChatSummary>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenameChatRequest<'a> {
    pub title: &'a str,
}

/// Where a message is sent: a local session or a backend chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationScope {
    Session(String),
    Chat(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SendRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl SendRequest {
    pub fn new(message: impl Into<String>, scope: &ConversationScope) -> Self {
        let (session_id, chat_id) = match scope {
            ConversationScope::Session(id) => (Some(id.clone()), None),
            ConversationScope::Chat(id) => (None, Some(id.clone())),
        };
        Self {
            message: message.into(),
            session_id,
            chat_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClearSessionRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}
