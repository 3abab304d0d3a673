//! Conversation state and the flows that drive it.

pub mod controller;
pub mod history;
pub mod state;

pub use controller::{ChatController, StateHandle, restore_state};
pub use state::{
    ChatState, ConversationView, NoticeKind, Notification, PendingSend, Screen, SendBlocked,
    SendPhase,
};
