use super::history::{self, ConversationExport, MSG_EXPORTED, MSG_ITEM_DELETED, MSG_NO_RESULTS};
use super::state::{
    ChatState, ConversationView, DEFAULT_CHAT_TITLE, MSG_CHATS_FAILED, MSG_CODE_COPIED,
    MSG_CREATE_FAILED, MSG_DELETE_FAILED, NoticeKind, Screen, SendBlocked,
};
use crate::api::{ApiError, ChatBackend, SendRequest};
use crate::auth::{self, AuthOutcome, FormError, GateOutcome};
use crate::clipboard::{self, ClipboardSink, CopyOutcome};
use crate::config::{ChatMode, ClientConfig};
use crate::fallback::FallbackResponder;
use crate::format::now_timestamp;
use crate::session::generate_session_id;
use crate::settings::{Preferences, SettingKey, UiSettings};
use crate::sound::SoundCue;
use crate::storage::{KeyValueStore, SharedStore};
use crate::theme::next_theme;
use crate::types::{ChatMessage, ThemeMode};
use crate::validation::{ChangePasswordForm, LoginForm, RegisterForm};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

pub const MSG_SESSION_EXPIRED: &str = "Oturumunuz sona erdi. Lütfen tekrar giriş yapın.";
pub const MSG_TITLE_REQUIRED: &str = "Başlık gereklidir";
pub const MSG_TITLE_UPDATED: &str = "Başlık güncellendi";
pub const MSG_TITLE_FAILED: &str = "Başlık güncellenemedi";
pub const MSG_CLEAR_FAILED: &str = "Sohbet temizlenemedi";
pub const MSG_MANUAL_COPY: &str = "Kod seçildi, kopyalamak için Ctrl+C kullanın";

/// Shared access to the one `ChatState`.
///
/// Closures run synchronously and must not await; the controller never
/// holds state across a backend call.
pub trait StateHandle: Clone {
    fn with_state_mut<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R;
    fn with_state<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R;
}

impl StateHandle for Rc<RefCell<ChatState>> {
    fn with_state_mut<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut self.borrow_mut())
    }

    fn with_state<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R {
        f(&self.borrow())
    }
}

/// Build the starting state from stored preferences and settings.
pub fn restore_state(config: &ClientConfig, store: &dyn KeyValueStore) -> ChatState {
    let prefs = Preferences::load_or_init(store).unwrap_or_else(|err| {
        error!("failed to persist preferences, using a throwaway session: {err}");
        Preferences {
            session_id: Some(generate_session_id()),
            ..Preferences::load(store)
        }
    });
    let session_id = prefs.session_id.clone().unwrap_or_else(generate_session_id);
    let mut state = ChatState::new(config.chat_mode, session_id);
    state.theme = prefs.theme();
    state.settings = UiSettings::load(store);
    state
}

/// Drives `ChatState` transitions around backend calls.
///
/// Each operation applies the synchronous "before" transition, awaits the
/// backend, then applies the outcome. A 401 from any authenticated call
/// drops the credential and returns to the login screen.
pub struct ChatController<B: ?Sized, S> {
    backend: Rc<B>,
    state: S,
    store: SharedStore,
    responder: Rc<FallbackResponder>,
    config: Rc<ClientConfig>,
}

impl<B: ?Sized, S: Clone> Clone for ChatController<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            state: self.state.clone(),
            store: Rc::clone(&self.store),
            responder: Rc::clone(&self.responder),
            config: Rc::clone(&self.config),
        }
    }
}

impl<B: ChatBackend + ?Sized, S: StateHandle> ChatController<B, S> {
    pub fn new(backend: Rc<B>, state: S, store: SharedStore, config: ClientConfig) -> Self {
        Self {
            backend,
            state,
            store,
            responder: Rc::new(FallbackResponder::default()),
            config: Rc::new(config),
        }
    }

    pub fn with_responder(mut self, responder: FallbackResponder) -> Self {
        self.responder = Rc::new(responder);
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    fn token(&self) -> Option<String> {
        self.state.with_state(|state| state.token.clone())
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        self.state.with_state_mut(|state| {
            state.notify(kind, message);
        });
    }

    /// Returns true when `err` ended the session.
    fn handle_unauthorized(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        info!("backend rejected the credential, signing out");
        auth::clear_credentials(self.store());
        self.state.with_state_mut(|state| {
            state.signed_out();
            state.notify(NoticeKind::Warning, MSG_SESSION_EXPIRED);
        });
        true
    }

    // ============================================
    // Startup and auth
    // ============================================

    pub async fn bootstrap(&self) {
        match self.config.chat_mode {
            ChatMode::Session => {
                self.state.with_state_mut(|state| state.screen = Screen::Chat);
                self.check_health().await;
                self.load_history().await;
            }
            ChatMode::MultiChat => {
                match auth::validate_stored_credential(self.backend.as_ref(), self.store()).await {
                    GateOutcome::Valid { token, user } => {
                        self.state.with_state_mut(|state| state.signed_in(Some(token), user));
                        self.load_chats().await;
                    }
                    outcome => {
                        debug!(?outcome, "showing login");
                        self.state.with_state_mut(|state| state.screen = Screen::Login);
                    }
                }
            }
        }
    }

    async fn finish_sign_in(&self, outcome: &AuthOutcome) {
        if let AuthOutcome::SignedIn { token, user } = outcome {
            if let Err(err) = auth::persist_credentials(self.store(), token, user) {
                error!("failed to store credential: {err}");
            }
            let (token, user) = (token.clone(), user.clone());
            self.state.with_state_mut(|state| state.signed_in(Some(token), user));
            self.load_chats().await;
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<AuthOutcome, FormError> {
        let outcome = auth::login(self.backend.as_ref(), self.config.auth_flow, form).await?;
        self.finish_sign_in(&outcome).await;
        Ok(outcome)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<AuthOutcome, FormError> {
        let outcome = auth::register(self.backend.as_ref(), self.config.auth_flow, form).await?;
        self.finish_sign_in(&outcome).await;
        Ok(outcome)
    }

    pub async fn resend_verification(&self, email: &str) -> Result<String, FormError> {
        auth::resend_verification(self.backend.as_ref(), email).await
    }

    /// Outcome is also raised as a notification.
    pub async fn change_password(&self, form: &ChangePasswordForm) -> Result<String, FormError> {
        let Some(token) = self.token() else {
            self.notify(NoticeKind::Error, auth::MSG_PASSWORD_FAILED);
            return Err(FormError::Server(auth::MSG_PASSWORD_FAILED.to_string()));
        };
        let result = auth::change_password(self.backend.as_ref(), &token, form).await;
        match &result {
            Ok(message) => self.notify(NoticeKind::Success, message.clone()),
            Err(err) => self.notify(NoticeKind::Error, err.to_string()),
        }
        result
    }

    pub async fn logout(&self) {
        auth::logout(self.backend.as_ref(), self.store()).await;
        self.state.with_state_mut(ChatState::signed_out);
    }

    // ============================================
    // Messages
    // ============================================

    /// Run one send through the state machine. Only entry checks fail; every
    /// backend outcome ends back in idle.
    pub async fn send_message(&self, text: &str) -> Result<(), SendBlocked> {
        let timestamp = Some(now_timestamp());
        let pending = self.state.with_state_mut(|state| state.begin_send(text, timestamp))?;
        let request = SendRequest::new(pending.text.clone(), &pending.scope);
        let result = self
            .backend
            .send_message(self.token().as_deref(), &request)
            .await;

        let still_here = self
            .state
            .with_state(|state| state.current_scope().as_ref() == Some(&pending.scope));
        if !still_here {
            debug!("conversation changed while sending; dropping the outcome");
            self.state.with_state_mut(|state| state.abandon_send());
            return Ok(());
        }

        match result {
            Ok(reply) => {
                self.state.with_state_mut(|state| {
                    state.online = true;
                    state.complete_send(reply);
                });
                self.reconcile().await;
            }
            Err(err) if err.is_transport() => {
                warn!("send failed, answering locally: {err}");
                let content = self
                    .responder
                    .offline_reply(&pending.text, &mut rand::thread_rng());
                self.state.with_state_mut(|state| {
                    state.online = false;
                    state.fallback_send(content, Some(now_timestamp()));
                });
            }
            Err(err) => {
                self.state.with_state_mut(|state| state.reject_send(&err));
                self.handle_unauthorized(&err);
            }
        }
        Ok(())
    }

    /// Bring local state back in line with the backend after a send.
    async fn reconcile(&self) {
        match self.config.chat_mode {
            ChatMode::MultiChat => self.load_chats().await,
            ChatMode::Session => self.load_history().await,
        }
    }

    // ============================================
    // Chat list
    // ============================================

    pub async fn load_chats(&self) {
        let Some(token) = self.token() else {
            return;
        };
        match self.backend.list_chats(&token).await {
            Ok(chats) => {
                let previous = self.state.with_state(|state| state.active_chat.clone());
                let next = self.state.with_state_mut(|state| state.apply_chat_list(chats));
                if let Some(id) = next.filter(|id| previous.as_ref() != Some(id)) {
                    self.load_chat_messages(&id).await;
                }
            }
            Err(err) => {
                if !self.handle_unauthorized(&err) {
                    warn!("chat list failed: {err}");
                    self.notify(NoticeKind::Error, MSG_CHATS_FAILED);
                }
            }
        }
    }

    pub async fn select_chat(&self, chat_id: &str) {
        self.state.with_state_mut(|state| state.select_chat(chat_id));
        self.load_chat_messages(chat_id).await;
    }

    async fn load_chat_messages(&self, chat_id: &str) {
        let Some(token) = self.token() else {
            return;
        };
        self.state.with_state_mut(|state| {
            if state.view != ConversationView::Loading {
                state.select_chat(chat_id);
            }
        });
        match self.backend.chat_detail(&token, chat_id).await {
            Ok(detail) => {
                if !self
                    .state
                    .with_state_mut(|state| state.apply_chat_messages(chat_id, detail.messages))
                {
                    debug!(chat_id, "dropping messages for a chat no longer selected");
                }
            }
            Err(err) => {
                if !self.handle_unauthorized(&err) {
                    warn!(chat_id, "chat messages failed: {err}");
                    self.state.with_state_mut(|state| state.chat_load_failed(chat_id));
                }
            }
        }
    }

    pub async fn create_chat(&self) {
        let Some(token) = self.token() else {
            return;
        };
        match self.backend.create_chat(&token, DEFAULT_CHAT_TITLE).await {
            Ok(created) => {
                self.state.with_state_mut(|state| state.chat_created(created.chat_id));
                self.load_chats().await;
            }
            Err(err) => {
                if !self.handle_unauthorized(&err) {
                    let message = err.server_message().unwrap_or(MSG_CREATE_FAILED).to_string();
                    self.notify(NoticeKind::Error, message);
                }
            }
        }
    }

    pub fn request_delete(&self, chat_id: &str) {
        self.state.with_state_mut(|state| state.request_delete(chat_id));
    }

    pub fn cancel_delete(&self) {
        self.state.with_state_mut(ChatState::cancel_delete);
    }

    /// Second step of the delete gate; a no-op unless a delete was requested.
    pub async fn confirm_delete(&self) {
        let Some(chat_id) = self.state.with_state(|state| state.pending_delete.clone()) else {
            return;
        };
        let Some(token) = self.token() else {
            return;
        };
        match self.backend.delete_chat(&token, &chat_id).await {
            Ok(()) => {
                self.state.with_state_mut(|state| state.chat_deleted(&chat_id));
                self.load_chats().await;
            }
            Err(err) => {
                self.state.with_state_mut(ChatState::cancel_delete);
                if !self.handle_unauthorized(&err) {
                    let message = err.server_message().unwrap_or(MSG_DELETE_FAILED).to_string();
                    self.notify(NoticeKind::Error, message);
                }
            }
        }
    }

    pub async fn rename_chat(&self, chat_id: &str, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.notify(NoticeKind::Error, MSG_TITLE_REQUIRED);
            return;
        }
        let Some(token) = self.token() else {
            return;
        };
        match self.backend.rename_chat(&token, chat_id, title).await {
            Ok(()) => self.state.with_state_mut(|state| {
                state.chat_renamed(chat_id, title);
                state.notify(NoticeKind::Success, MSG_TITLE_UPDATED);
            }),
            Err(err) => {
                if !self.handle_unauthorized(&err) {
                    let message = err.server_message().unwrap_or(MSG_TITLE_FAILED).to_string();
                    self.notify(NoticeKind::Error, message);
                }
            }
        }
    }

    /// Empty the open conversation on the backend and locally.
    pub async fn clear_conversation(&self) {
        match self.config.chat_mode {
            ChatMode::Session => self.clear_memory().await,
            ChatMode::MultiChat => {
                let (Some(token), Some(chat_id)) =
                    (self.token(), self.state.with_state(|state| state.active_chat.clone()))
                else {
                    return;
                };
                match self.backend.clear_chat(&token, &chat_id).await {
                    Ok(()) => self.state.with_state_mut(ChatState::clear_conversation),
                    Err(err) => {
                        if !self.handle_unauthorized(&err) {
                            let message =
                                err.server_message().unwrap_or(MSG_CLEAR_FAILED).to_string();
                            self.notify(NoticeKind::Error, message);
                        }
                    }
                }
            }
        }
    }

    // ============================================
    // Session conversation tools
    // ============================================

    /// Replace the conversation with the backend's copy. Skipped while the
    /// backend is known to be offline.
    pub async fn load_history(&self) {
        let (online, session_id) = self
            .state
            .with_state(|state| (state.online, state.session_id.clone()));
        if !online {
            debug!("backend offline, keeping local history");
            return;
        }
        match self.backend.history(&session_id).await {
            Ok(history) => self.state.with_state_mut(|state| state.apply_history(history)),
            Err(err) if err.is_transport() => {
                warn!("history unavailable: {err}");
                self.state.with_state_mut(|state| state.online = false);
            }
            Err(err) => warn!("history request rejected: {err}"),
        }
    }

    /// Local conversation is emptied whatever the backend says.
    pub async fn clear_memory(&self) {
        let session_id = self.state.with_state(|state| state.session_id.clone());
        self.state.with_state_mut(ChatState::clear_conversation);
        if let Err(err) = self.backend.clear_session(&session_id).await {
            warn!("clear request failed: {err}");
        }
    }

    pub async fn check_health(&self) -> bool {
        let online = match self.backend.health().await {
            Ok(health) => {
                debug!(status = %health.status, model = ?health.model, "backend healthy");
                true
            }
            Err(err) => {
                warn!("health check failed: {err}");
                false
            }
        };
        self.state.with_state_mut(|state| state.online = online);
        online
    }

    pub fn search_history(&self, query: &str) -> Vec<(usize, ChatMessage)> {
        let hits: Vec<(usize, ChatMessage)> = self.state.with_state(|state| {
            history::search(&state.messages, query)
                .into_iter()
                .map(|(index, message)| (index, message.clone()))
                .collect()
        });
        if hits.is_empty() {
            self.notify(NoticeKind::Error, MSG_NO_RESULTS);
        } else {
            self.notify(NoticeKind::Success, history::results_notice(hits.len()));
        }
        hits
    }

    pub fn delete_history_item(&self, index: usize) {
        self.state.with_state_mut(|state| {
            if state.remove_message(index).is_some() {
                state.notify(NoticeKind::Success, MSG_ITEM_DELETED);
            }
        });
    }

    /// File name and JSON body of the conversation export.
    pub fn export_conversation(&self) -> serde_json::Result<(String, String)> {
        let exported = self.state.with_state(|state| {
            let export = ConversationExport::new(&state.session_id, &state.messages);
            export.to_json().map(|json| (export.file_name(), json))
        })?;
        self.notify(NoticeKind::Success, MSG_EXPORTED);
        Ok(exported)
    }

    // ============================================
    // Presentation
    // ============================================

    pub fn set_theme(&self, theme: ThemeMode) {
        self.state.with_state_mut(|state| state.set_theme(theme));
        let mut prefs = Preferences::load(self.store());
        prefs.theme = Some(theme);
        if let Err(err) = prefs.save(self.store()) {
            error!("failed to store theme: {err}");
        }
    }

    pub fn cycle_theme(&self) {
        let next = next_theme(self.state.with_state(|state| state.theme));
        self.set_theme(next);
    }

    pub fn toggle_setting(&self, key: SettingKey) {
        let settings = self.state.with_state_mut(|state| {
            let on = !state.settings.get(key);
            state.set_setting(key, on);
            state.settings
        });
        if let Err(err) = settings.save(self.store()) {
            error!("failed to store settings: {err}");
        }
    }

    pub fn copy_code(&self, sink: &mut dyn ClipboardSink, original: &str) -> CopyOutcome {
        let outcome = clipboard::copy_code(sink, original);
        self.record_copy(&outcome);
        outcome
    }

    /// Report a copy done outside a `ClipboardSink` (the browser clipboard).
    pub fn record_copy(&self, outcome: &CopyOutcome) {
        self.state.with_state_mut(|state| match outcome {
            CopyOutcome::Copied(_) => {
                state.notify(NoticeKind::Success, MSG_CODE_COPIED);
                state.cue(SoundCue::Success);
            }
            CopyOutcome::ManualSelection(_) => {
                state.notify(NoticeKind::Warning, MSG_MANUAL_COPY);
            }
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.state.with_state_mut(|state| state.dismiss(id));
    }
}
