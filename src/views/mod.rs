pub mod auth;
pub mod chat;
pub mod history;
pub mod settings;
pub mod shared;
pub mod sidebar;

pub use auth::AuthView;
pub use chat::ChatView;
pub use history::HistoryModal;
pub use settings::SettingsModal;
pub use sidebar::Sidebar;
