use super::{ApiError, ApiResult, ChatBackend, wire::*};
use crate::types::{ChatMessage, ChatSummary, User};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// reqwest client for the Pahiy backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.inspect_err(|err| {
            warn!("backend unreachable: {err}");
        })?;
        let status = response.status();
        debug!(%status, url = %response.url(), "backend response");
        let body = response.text().await?;
        decode_response(status.as_u16(), &body)
    }
}

/// Turn a status + body into the typed result.
///
/// A 2xx body that does not decode is a transport-class failure, the same as
/// the network dropping.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    if (200..300).contains(&status) {
        serde_json::from_str(body).map_err(|err| ApiError::Malformed(err.to_string()))
    } else {
        Err(ApiError::from_error_body(status, body))
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.execute(self.client.post(self.url("/api/login")).json(request))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.execute(self.client.post(self.url("/api/register")).json(request))
            .await
    }

    async fn resend_verification(
        &self,
        request: &ResendVerificationRequest,
    ) -> ApiResult<MessageResponse> {
        self.execute(
            self.client
                .post(self.url("/api/resend-verification"))
                .json(request),
        )
        .await
    }

    async fn me(&self, token: &str) -> ApiResult<User> {
        let me: MeResponse = self
            .execute(self.client.get(self.url("/api/me")).bearer_auth(token))
            .await?;
        Ok(me.user)
    }

    async fn logout(&self, token: &str) -> ApiResult<()> {
        let _: MessageResponse = self
            .execute(self.client.post(self.url("/api/logout")).bearer_auth(token))
            .await?;
        Ok(())
    }

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> ApiResult<MessageResponse> {
        self.execute(
            self.client
                .post(self.url("/api/change-password"))
                .bearer_auth(token)
                .json(request),
        )
        .await
    }

    async fn list_chats(&self, token: &str) -> ApiResult<Vec<ChatSummary>> {
        let chats: ChatsResponse = self
            .execute(self.client.get(self.url("/api/chats")).bearer_auth(token))
            .await?;
        Ok(chats.chats)
    }

    async fn create_chat(&self, token: &str, title: &str) -> ApiResult<CreatedChat> {
        self.execute(
            self.client
                .post(self.url("/api/chats"))
                .bearer_auth(token)
                .json(&CreateChatRequest { title }),
        )
        .await
    }

    async fn chat_detail(&self, token: &str, chat_id: &str) -> ApiResult<ChatDetail> {
        self.execute(
            self.client
                .get(self.url(&format!("/api/chats/{chat_id}")))
                .bearer_auth(token),
        )
        .await
    }

    async fn delete_chat(&self, token: &str, chat_id: &str) -> ApiResult<()> {
        let _: MessageResponse = self
            .execute(
                self.client
                    .delete(self.url(&format!("/api/chats/{chat_id}")))
                    .bearer_auth(token),
            )
            .await?;
        Ok(())
    }

    async fn rename_chat(&self, token: &str, chat_id: &str, title: &str) -> ApiResult<()> {
        let _: MessageResponse = self
            .execute(
                self.client
                    .put(self.url(&format!("/api/chats/{chat_id}/title")))
                    .bearer_auth(token)
                    .json(&RenameChatRequest { title }),
            )
            .await?;
        Ok(())
    }

    async fn clear_chat(&self, token: &str, chat_id: &str) -> ApiResult<()> {
        let _: MessageResponse = self
            .execute(
                self.client
                    .post(self.url(&format!("/api/chats/{chat_id}/clear")))
                    .bearer_auth(token),
            )
            .await?;
        Ok(())
    }

    async fn send_message(&self, token: Option<&str>, request: &SendRequest) -> ApiResult<ChatReply> {
        let mut builder = self.client.post(self.url("/api/chat")).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        self.execute(builder).await
    }

    async fn history(&self, session_id: &str) -> ApiResult<Vec<ChatMessage>> {
        let history: HistoryResponse = self
            .execute(
                self.client
                    .get(self.url("/api/history"))
                    .query(&[("session_id", session_id)]),
            )
            .await?;
        Ok(history.history)
    }

    async fn clear_session(&self, session_id: &str) -> ApiResult<()> {
        let _: MessageResponse = self
            .execute(
                self.client
                    .post(self.url("/api/clear"))
                    .json(&ClearSessionRequest { session_id }),
            )
            .await?;
        Ok(())
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        self.execute(self.client.get(self.url("/api/health"))).await
    }
}
