use crate::api::HttpBackend;
use crate::chat::{ChatController, ChatState, Screen, StateHandle, restore_state};
use crate::config::{ChatMode, ClientConfig};
use crate::storage::{SharedStore, platform_store};
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::shared::{Notifications, play_cue};
use crate::views::{AuthView, ChatView, HistoryModal, SettingsModal, Sidebar};
use dioxus::prelude::*;
use std::rc::Rc;
use tracing::error;

const PAHIY_CSS: Asset = asset!("/assets/pahiy.css");
const ICONS_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

pub type AppController = ChatController<HttpBackend, Signal<ChatState>>;

impl StateHandle for Signal<ChatState> {
    fn with_state_mut<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        let mut signal = *self;
        signal.with_mut(f)
    }

    fn with_state<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R {
        self.with(f)
    }
}

/// The controller provided by `App`.
pub fn use_controller() -> AppController {
    use_context::<AppController>()
}

#[component]
pub fn App() -> Element {
    let (config, store) = use_hook(|| {
        let config = ClientConfig::from_env().unwrap_or_else(|err| {
            error!("invalid configuration, using defaults: {err:#}");
            ClientConfig::default()
        });
        let store: SharedStore = platform_store(config.storage_dir.clone());
        (config, store)
    });
    let state = use_signal(|| restore_state(&config, store.as_ref()));
    let controller = use_context_provider(|| {
        let backend = Rc::new(HttpBackend::new(config.backend_url.clone()));
        ChatController::new(backend, state, store.clone(), config.clone())
    });

    let boot = controller.clone();
    use_hook(move || {
        spawn(async move { boot.bootstrap().await });
    });

    use_sound_cues(state);

    let snapshot = state.read();
    let screen = snapshot.screen;
    let theme = snapshot.theme;
    let animations = snapshot.settings.animations;
    drop(snapshot);

    rsx! {
        ThemeStyles { theme }
        div { class: if animations { "app" } else { "app no-animations" },
            {match screen {
                Screen::Checking => rsx! { LoadingScreen {} },
                Screen::Login => rsx! { AuthView {} },
                Screen::Chat => rsx! { ChatLayout {} },
            }}
            Notifications {}
        }
    }
}

/// Play queued cues through the renderer.
fn use_sound_cues(state: Signal<ChatState>) {
    use_effect(move || {
        if state.read().sounds.is_empty() {
            return;
        }
        let mut state = state;
        let cues = state.write().take_sounds();
        for cue in cues {
            play_cue(cue);
        }
    });
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        document::Link { rel: "stylesheet", href: ICONS_CSS }
        document::Link { rel: "stylesheet", href: PAHIY_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn LoadingScreen() -> Element {
    rsx! {
        div { class: "splash-overlay", aria_hidden: "true",
            div { class: "splash-content",
                div { class: "splash-logo", "Pahiy AI" }
                div { class: "typing-indicator visible",
                    span {} span {} span {}
                }
            }
        }
    }
}

#[component]
fn ChatLayout() -> Element {
    let controller = use_controller();
    let show_settings = use_signal(|| false);
    let show_history = use_signal(|| false);
    let multi_chat = controller.config().chat_mode == ChatMode::MultiChat;

    rsx! {
        div { class: "chat-layout",
            if multi_chat {
                Sidebar { show_settings }
            }
            ChatView { show_settings, show_history }
        }
        if show_settings() {
            SettingsModal { open: show_settings }
        }
        if show_history() {
            HistoryModal { open: show_history }
        }
    }
}
