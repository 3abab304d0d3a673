//! Scripted backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pahiy::api::{
    ApiError, ApiResult, AuthResponse, ChangePasswordRequest, ChatBackend, ChatDetail, ChatReply,
    CreatedChat, HealthResponse, LoginRequest, MessageResponse, RegisterRequest,
    ResendVerificationRequest, SendRequest,
};
use pahiy::chat::{ChatController, ChatState};
use pahiy::config::{ChatMode, ClientConfig};
use pahiy::storage::{MemoryStore, SharedStore};
use pahiy::types::{ChatMessage, ChatSummary, User};
use std::cell::RefCell;
use std::rc::Rc;

pub type TestController = ChatController<MockBackend, Rc<RefCell<ChatState>>>;

pub fn user() -> User {
    User {
        id: 7,
        first_name: "Ayaz".into(),
        last_name: "Demir".into(),
        username: "ayaz".into(),
        email: "ayaz@example.com".into(),
    }
}

pub fn chat(id: &str, title: &str) -> ChatSummary {
    ChatSummary {
        id: id.into(),
        title: title.into(),
        created_at: Some("2024-05-01 10:00:00".into()),
        updated_at: None,
    }
}

pub fn unauthorized() -> ApiError {
    ApiError::Server {
        status: 401,
        message: Some("Token geçersiz".into()),
        requires_verification: false,
        email: None,
    }
}

pub fn offline() -> ApiError {
    ApiError::Transport("connection refused".into())
}

/// Records every call by endpoint name and answers from scripted results.
pub struct MockBackend {
    pub calls: RefCell<Vec<&'static str>>,
    pub auth: RefCell<ApiResult<AuthResponse>>,
    pub logged_in: RefCell<Option<LoginRequest>>,
    pub registered: RefCell<Option<RegisterRequest>>,
    pub me: RefCell<ApiResult<User>>,
    pub chats: RefCell<Vec<ChatSummary>>,
    pub list_error: RefCell<Option<ApiError>>,
    pub messages: RefCell<Vec<ChatMessage>>,
    pub send: RefCell<ApiResult<ChatReply>>,
    pub sent: RefCell<Vec<SendRequest>>,
    pub history: RefCell<ApiResult<Vec<ChatMessage>>>,
    pub health: RefCell<ApiResult<HealthResponse>>,
    next_chat: RefCell<u32>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            auth: RefCell::new(Ok(AuthResponse {
                token: Some("tok".into()),
                user: Some(user()),
                ..AuthResponse::default()
            })),
            logged_in: RefCell::new(None),
            registered: RefCell::new(None),
            me: RefCell::new(Ok(user())),
            chats: RefCell::new(Vec::new()),
            list_error: RefCell::new(None),
            messages: RefCell::new(Vec::new()),
            send: RefCell::new(Ok(ChatReply {
                response: "Merhaba! Size nasıl yardımcı olabilirim?".into(),
                timestamp: Some("2024-05-01T10:00:05Z".into()),
            })),
            sent: RefCell::new(Vec::new()),
            history: RefCell::new(Ok(Vec::new())),
            health: RefCell::new(Ok(HealthResponse {
                status: "ok".into(),
                model: None,
            })),
            next_chat: RefCell::new(1),
        }
    }
}

impl MockBackend {
    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }
}

#[async_trait(?Send)]
impl ChatBackend for MockBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.record("login");
        *self.logged_in.borrow_mut() = Some(request.clone());
        self.auth.borrow().clone()
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.record("register");
        *self.registered.borrow_mut() = Some(request.clone());
        self.auth.borrow().clone()
    }

    async fn resend_verification(
        &self,
        _request: &ResendVerificationRequest,
    ) -> ApiResult<MessageResponse> {
        self.record("resend_verification");
        Ok(MessageResponse::default())
    }

    async fn me(&self, _token: &str) -> ApiResult<User> {
        self.record("me");
        self.me.borrow().clone()
    }

    async fn logout(&self, _token: &str) -> ApiResult<()> {
        self.record("logout");
        Ok(())
    }

    async fn change_password(
        &self,
        _token: &str,
        _request: &ChangePasswordRequest,
    ) -> ApiResult<MessageResponse> {
        self.record("change_password");
        Ok(MessageResponse::default())
    }

    async fn list_chats(&self, _token: &str) -> ApiResult<Vec<ChatSummary>> {
        self.record("list_chats");
        match self.list_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.chats.borrow().clone()),
        }
    }

    async fn create_chat(&self, _token: &str, title: &str) -> ApiResult<CreatedChat> {
        self.record("create_chat");
        let id = {
            let mut next = self.next_chat.borrow_mut();
            let id = format!("new-{next}");
            *next += 1;
            id
        };
        self.chats.borrow_mut().insert(0, chat(&id, title));
        Ok(CreatedChat {
            chat_id: id,
            title: Some(title.to_string()),
        })
    }

    async fn chat_detail(&self, _token: &str, _chat_id: &str) -> ApiResult<ChatDetail> {
        self.record("chat_detail");
        Ok(ChatDetail {
            chat: None,
            messages: self.messages.borrow().clone(),
        })
    }

    async fn delete_chat(&self, _token: &str, chat_id: &str) -> ApiResult<()> {
        self.record("delete_chat");
        self.chats.borrow_mut().retain(|chat| chat.id != chat_id);
        Ok(())
    }

    async fn rename_chat(&self, _token: &str, chat_id: &str, title: &str) -> ApiResult<()> {
        self.record("rename_chat");
        if let Some(chat) = self.chats.borrow_mut().iter_mut().find(|c| c.id == chat_id) {
            chat.title = title.to_string();
        }
        Ok(())
    }

    async fn clear_chat(&self, _token: &str, _chat_id: &str) -> ApiResult<()> {
        self.record("clear_chat");
        Ok(())
    }

    async fn send_message(
        &self,
        _token: Option<&str>,
        request: &SendRequest,
    ) -> ApiResult<ChatReply> {
        self.record("send_message");
        self.sent.borrow_mut().push(request.clone());
        self.send.borrow().clone()
    }

    async fn history(&self, _session_id: &str) -> ApiResult<Vec<ChatMessage>> {
        self.record("history");
        self.history.borrow().clone()
    }

    async fn clear_session(&self, _session_id: &str) -> ApiResult<()> {
        self.record("clear_session");
        Ok(())
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        self.record("health");
        self.health.borrow().clone()
    }
}

pub struct Harness {
    pub backend: Rc<MockBackend>,
    pub state: Rc<RefCell<ChatState>>,
    pub store: Rc<MemoryStore>,
    pub controller: TestController,
}

pub fn harness(mode: ChatMode, backend: MockBackend) -> Harness {
    harness_with_store(mode, backend, Rc::new(MemoryStore::new()))
}

pub fn harness_with_store(mode: ChatMode, backend: MockBackend, store: Rc<MemoryStore>) -> Harness {
    let backend = Rc::new(backend);
    let state = Rc::new(RefCell::new(ChatState::new(mode, "session_test_1")));
    let config = ClientConfig {
        chat_mode: mode,
        ..ClientConfig::default()
    };
    let shared: SharedStore = store.clone();
    let controller = ChatController::new(Rc::clone(&backend), Rc::clone(&state), shared, config);
    Harness {
        backend,
        state,
        store,
        controller,
    }
}

/// Multi-chat harness already signed in with `chats` on the backend.
pub async fn signed_in(chats: Vec<ChatSummary>) -> Harness {
    let backend = MockBackend::default();
    *backend.chats.borrow_mut() = chats;
    let h = harness(ChatMode::MultiChat, backend);
    h.state
        .borrow_mut()
        .signed_in(Some("tok".into()), user());
    h.controller.load_chats().await;
    h.backend.calls.borrow_mut().clear();
    h
}
