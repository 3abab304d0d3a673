/// Backend API for the Pahiy client
///
/// The client never owns authoritative state; every chat, message and
/// credential comes from the backend reached over HTTP JSON.
///
/// # Architecture
///
/// - `ChatBackend` - the seam the controller talks through
/// - `http` - reqwest implementation used by the app
/// - `wire` - request/response bodies
mod error;
mod http;
pub mod wire;

use crate::types::{ChatMessage, ChatSummary, User};
use async_trait::async_trait;

pub use error::{ApiError, ApiResult};
pub use http::{HttpBackend, decode_response};
pub use wire::*;

/// Calls the client makes against the backend.
///
/// Futures are not `Send`: the client runs on a single UI thread and the
/// browser fetch futures are not `Send` either.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;

    async fn resend_verification(&self, request: &ResendVerificationRequest)
    -> ApiResult<MessageResponse>;

    async fn me(&self, token: &str) -> ApiResult<User>;

    async fn logout(&self, token: &str) -> ApiResult<()>;

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> ApiResult<MessageResponse>;

    async fn list_chats(&self, token: &str) -> ApiResult<Vec<ChatSummary>>;

    async fn create_chat(&self, token: &str, title: &str) -> ApiResult<CreatedChat>;

    async fn chat_detail(&self, token: &str, chat_id: &str) -> ApiResult<ChatDetail>;

    async fn delete_chat(&self, token: &str, chat_id: &str) -> ApiResult<()>;

    async fn rename_chat(&self, token: &str, chat_id: &str, title: &str) -> ApiResult<()>;

    async fn clear_chat(&self, token: &str, chat_id: &str) -> ApiResult<()>;

    async fn send_message(&self, token: Option<&str>, request: &SendRequest) -> ApiResult<ChatReply>;

    async fn history(&self, session_id: &str) -> ApiResult<Vec<ChatMessage>>;

    async fn clear_session(&self, session_id: &str) -> ApiResult<()>;

    async fn health(&self) -> ApiResult<HealthResponse>;
}
