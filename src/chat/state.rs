use crate::api::{ApiError, ChatReply, ConversationScope};
use crate::config::ChatMode;
use crate::settings::{SettingKey, UiSettings};
use crate::sound::SoundCue;
use crate::types::{ChatMessage, ChatSummary, ThemeMode, User};

pub const MSG_SELECT_CHAT: &str = "Lütfen bir sohbet seçin";
pub const MSG_SEND_FAILED: &str = "Mesaj gönderilemedi";
pub const MSG_OFFLINE_MODE: &str = "❌ Backend hatası - Lokal moda geçildi";
pub const MSG_CONNECTION: &str = "Bağlantı hatası";
pub const MSG_CHATS_FAILED: &str = "Chatler yüklenemedi";
pub const MSG_CREATE_FAILED: &str = "Sohbet oluşturulamadı";
pub const MSG_DELETE_FAILED: &str = "Sohbet silinemedi";
pub const MSG_CHAT_DELETED: &str = "Sohbet silindi";
pub const MSG_MEMORY_CLEARED: &str = "🧹 Hafıza temizlendi!";
pub const MSG_CODE_COPIED: &str = "✅ Kod panoya kopyalandı!";
pub const DEFAULT_CHAT_TITLE: &str = "Yeni Sohbet";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    /// Stored credential is being validated.
    #[default]
    Checking,
    Login,
    Chat,
}

/// What the message pane shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConversationView {
    /// No chat exists (or the session has no messages yet).
    #[default]
    Welcome,
    /// A chat is selected but has no messages.
    EmptyChat,
    Loading,
    Messages,
    LoadFailed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SendPhase {
    #[default]
    Idle,
    Sending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn icon(self) -> &'static str {
        match self {
            NoticeKind::Success => "check-circle",
            NoticeKind::Error => "exclamation-circle",
            NoticeKind::Warning => "exclamation-triangle",
            NoticeKind::Info => "info-circle",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Warning => "warning",
            NoticeKind::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Why a send never left the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendBlocked {
    Empty,
    InFlight,
    NoChatSelected,
}

/// A send that passed the entry checks and is waiting on the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSend {
    pub text: String,
    pub scope: ConversationScope,
}

/// The whole client-side view of the application.
///
/// Every transition is a plain method so the flow can be exercised without a
/// renderer; the UI only reads this and forwards events.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatState {
    pub mode: ChatMode,
    pub screen: Screen,
    pub user: Option<User>,
    pub token: Option<String>,
    pub session_id: String,
    pub chats: Vec<ChatSummary>,
    pub active_chat: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub view: ConversationView,
    pub phase: SendPhase,
    pub pending_delete: Option<String>,
    pub online: bool,
    pub settings: UiSettings,
    pub theme: ThemeMode,
    pub notifications: Vec<Notification>,
    /// Cues waiting to be played by the renderer.
    pub sounds: Vec<SoundCue>,
    next_notification: u64,
}

impl ChatState {
    pub fn new(mode: ChatMode, session_id: impl Into<String>) -> Self {
        Self {
            mode,
            screen: Screen::Checking,
            user: None,
            token: None,
            session_id: session_id.into(),
            chats: Vec::new(),
            active_chat: None,
            messages: Vec::new(),
            view: ConversationView::Welcome,
            phase: SendPhase::Idle,
            pending_delete: None,
            online: true,
            settings: UiSettings::default(),
            theme: ThemeMode::default(),
            notifications: Vec::new(),
            sounds: Vec::new(),
            next_notification: 1,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.phase == SendPhase::Sending
    }

    pub fn greeting_name(&self) -> String {
        self.user
            .as_ref()
            .map(User::full_name)
            .unwrap_or_else(|| "Kullanıcı".to_string())
    }

    // ---------------
    // Notifications and sound cues
    // ---------------

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let id = self.next_notification;
        self.next_notification += 1;
        self.notifications.push(Notification {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notifications.retain(|notice| notice.id != id);
    }

    pub fn cue(&mut self, cue: SoundCue) {
        if self.settings.sounds {
            self.sounds.push(cue);
        }
    }

    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    // ---------------
    // Auth
    // ---------------

    pub fn signed_in(&mut self, token: Option<String>, user: User) {
        self.token = token;
        self.user = Some(user);
        self.screen = Screen::Chat;
    }

    pub fn signed_out(&mut self) {
        self.token = None;
        self.user = None;
        self.chats.clear();
        self.active_chat = None;
        self.messages.clear();
        self.pending_delete = None;
        self.view = ConversationView::Welcome;
        self.phase = SendPhase::Idle;
        self.screen = Screen::Login;
    }

    // ---------------
    // Message send state machine: idle -> sending -> (success | rejected | fallback) -> idle
    // ---------------

    pub fn begin_send(
        &mut self,
        text: &str,
        timestamp: Option<String>,
    ) -> Result<PendingSend, SendBlocked> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendBlocked::Empty);
        }
        if self.is_sending() {
            return Err(SendBlocked::InFlight);
        }
        let scope = match self.mode {
            ChatMode::Session => ConversationScope::Session(self.session_id.clone()),
            ChatMode::MultiChat => match &self.active_chat {
                Some(id) => ConversationScope::Chat(id.clone()),
                None => {
                    self.notify(NoticeKind::Error, MSG_SELECT_CHAT);
                    return Err(SendBlocked::NoChatSelected);
                }
            },
        };

        self.messages.push(ChatMessage::user(text, timestamp));
        self.view = ConversationView::Messages;
        self.phase = SendPhase::Sending;
        Ok(PendingSend {
            text: text.to_string(),
            scope,
        })
    }

    pub fn complete_send(&mut self, reply: ChatReply) {
        self.messages.push(ChatMessage::ai(reply.response, reply.timestamp));
        self.phase = SendPhase::Idle;
        self.cue(SoundCue::Message);
    }

    /// Where a send issued now would go.
    pub fn current_scope(&self) -> Option<ConversationScope> {
        match self.mode {
            ChatMode::Session => Some(ConversationScope::Session(self.session_id.clone())),
            ChatMode::MultiChat => self.active_chat.clone().map(ConversationScope::Chat),
        }
    }

    /// The user switched conversations while the send was in flight; its
    /// outcome belongs to a conversation no longer on screen.
    pub fn abandon_send(&mut self) {
        self.phase = SendPhase::Idle;
    }

    /// The backend answered with an error status.
    pub fn reject_send(&mut self, error: &ApiError) {
        let message = error.server_message().unwrap_or(MSG_SEND_FAILED).to_string();
        self.notify(NoticeKind::Error, message);
        self.phase = SendPhase::Idle;
        self.cue(SoundCue::Error);
    }

    /// The backend could not be reached; `content` already carries the disclaimer.
    pub fn fallback_send(&mut self, content: String, timestamp: Option<String>) {
        let mut message = ChatMessage::ai(content, timestamp);
        message.offline = true;
        self.messages.push(message);
        self.notify(NoticeKind::Error, MSG_OFFLINE_MODE);
        self.phase = SendPhase::Idle;
        self.cue(SoundCue::Error);
    }

    // ---------------
    // Chat list
    // ---------------

    /// Install a fresh chat list and return the chat whose messages should be
    /// loaded next, if any.
    ///
    /// The active chat is kept only when it is still listed, so the selection
    /// never points at a chat the backend no longer has.
    pub fn apply_chat_list(&mut self, chats: Vec<ChatSummary>) -> Option<String> {
        self.chats = chats;
        let still_listed = self
            .active_chat
            .as_ref()
            .filter(|id| self.chats.iter().any(|chat| &chat.id == *id))
            .cloned();
        match still_listed.or_else(|| self.chats.first().map(|chat| chat.id.clone())) {
            Some(id) => {
                self.active_chat = Some(id.clone());
                Some(id)
            }
            None => {
                self.show_welcome();
                None
            }
        }
    }

    pub fn show_welcome(&mut self) {
        self.active_chat = None;
        self.messages.clear();
        self.view = ConversationView::Welcome;
    }

    pub fn select_chat(&mut self, chat_id: &str) {
        self.active_chat = Some(chat_id.to_string());
        self.messages.clear();
        self.view = ConversationView::Loading;
    }

    /// Messages for `chat_id` arrived. Responses for a chat that is no longer
    /// active are dropped.
    pub fn apply_chat_messages(&mut self, chat_id: &str, messages: Vec<ChatMessage>) -> bool {
        if self.active_chat.as_deref() != Some(chat_id) {
            return false;
        }
        self.view = if messages.is_empty() {
            ConversationView::EmptyChat
        } else {
            ConversationView::Messages
        };
        self.messages = messages;
        true
    }

    pub fn chat_load_failed(&mut self, chat_id: &str) {
        if self.active_chat.as_deref() == Some(chat_id) {
            self.messages.clear();
            self.view = ConversationView::LoadFailed;
        }
    }

    pub fn chat_created(&mut self, chat_id: String) {
        self.active_chat = Some(chat_id);
        self.messages.clear();
        self.view = ConversationView::EmptyChat;
    }

    pub fn request_delete(&mut self, chat_id: &str) {
        self.pending_delete = Some(chat_id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn chat_deleted(&mut self, chat_id: &str) {
        self.pending_delete = None;
        self.chats.retain(|chat| chat.id != chat_id);
        if self.active_chat.as_deref() == Some(chat_id) {
            self.active_chat = None;
            self.messages.clear();
            self.view = ConversationView::Welcome;
        }
        self.notify(NoticeKind::Success, MSG_CHAT_DELETED);
    }

    pub fn chat_renamed(&mut self, chat_id: &str, title: &str) {
        if let Some(chat) = self.chats.iter_mut().find(|chat| chat.id == chat_id) {
            chat.title = title.to_string();
        }
    }

    // ---------------
    // Session conversation
    // ---------------

    pub fn apply_history(&mut self, messages: Vec<ChatMessage>) {
        self.view = if messages.is_empty() {
            ConversationView::Welcome
        } else {
            ConversationView::Messages
        };
        self.messages = messages;
    }

    pub fn clear_conversation(&mut self) {
        self.messages.clear();
        self.view = match self.mode {
            ChatMode::Session => ConversationView::Welcome,
            ChatMode::MultiChat if self.active_chat.is_some() => ConversationView::EmptyChat,
            ChatMode::MultiChat => ConversationView::Welcome,
        };
        self.notify(NoticeKind::Success, MSG_MEMORY_CLEARED);
        self.cue(SoundCue::Success);
    }

    pub fn remove_message(&mut self, index: usize) -> Option<ChatMessage> {
        if index >= self.messages.len() {
            return None;
        }
        let removed = self.messages.remove(index);
        if self.messages.is_empty() && self.mode == ChatMode::Session {
            self.view = ConversationView::Welcome;
        }
        Some(removed)
    }

    // ---------------
    // Presentation
    // ---------------

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        self.notify(NoticeKind::Success, crate::theme::activated_notice(theme));
    }

    pub fn set_setting(&mut self, key: SettingKey, on: bool) {
        self.settings.set(key, on);
        self.notify(NoticeKind::Success, key.toggled_notice(on));
    }
}
