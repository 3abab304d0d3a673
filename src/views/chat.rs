use crate::chat::{ChatState, ConversationView};
use crate::clipboard::CopyOutcome;
use crate::config::ChatMode;
use crate::format::{
    CharCountLevel, QuickAction, Segment, char_count, message_time, plain_text_html, segment_reply,
};
use crate::theme::theme_definition;
use crate::types::{ChatMessage, Role};
use crate::ui::use_controller;
use crate::views::shared::{copy_code_block, select_element};
use dioxus::events::Key;
use dioxus::prelude::*;
use tracing::debug;

const SCROLL_SCRIPT: &str = r#"const list = document.getElementById('messagesContainer');
if (list) { list.scrollTop = list.scrollHeight; }"#;

fn message_html(message: &ChatMessage) -> Option<String> {
    match message.role {
        Role::User => Some(plain_text_html(&message.content)),
        Role::Ai if message.offline => Some(plain_text_html(&message.content)),
        Role::Ai => None,
    }
}

fn chat_title(state: &ChatState) -> String {
    match state.mode {
        ChatMode::Session => "Pahiy AI".to_string(),
        ChatMode::MultiChat => state
            .active_chat
            .as_ref()
            .and_then(|id| state.chats.iter().find(|chat| &chat.id == id))
            .map(|chat| chat.title.clone())
            .unwrap_or_else(|| "Pahiy AI".to_string()),
    }
}

#[component]
pub fn ChatView(show_settings: Signal<bool>, show_history: Signal<bool>) -> Element {
    let controller = use_controller();
    let state = *controller.state();

    use_effect(move || {
        // Reading the whole state reruns this after every message or phase change.
        let enabled = state.read().settings.auto_scroll;
        if enabled {
            let _ = document::eval(SCROLL_SCRIPT);
        }
    });

    let snapshot = state();
    let title = chat_title(&snapshot);

    rsx! {
        main { class: "chat-main",
            ChatHeader { title, show_settings, show_history }
            div { id: "messagesContainer", class: "messages",
                {match snapshot.view {
                    ConversationView::Welcome => rsx! { Welcome { name: snapshot.greeting_name(), mode: snapshot.mode } },
                    ConversationView::EmptyChat => rsx! {
                        div { class: "empty-chat",
                            i { class: "fas fa-comments" }
                            p { "Yeni sohbet başladı! Bir mesaj yazarak başlayın." }
                        }
                    },
                    ConversationView::Loading => rsx! {
                        div { class: "loading-chat",
                            div { class: "spinner" }
                            p { "Mesajlar yükleniyor..." }
                        }
                    },
                    ConversationView::LoadFailed => rsx! {
                        div { class: "load-failed",
                            i { class: "fas fa-exclamation-triangle" }
                            p { "Mesajlar yüklenemedi" }
                        }
                    },
                    ConversationView::Messages => rsx! {
                        for (index, message) in snapshot.messages.iter().enumerate() {
                            MessageBubble { key: "{index}", message: message.clone() }
                        }
                    },
                }}
                if snapshot.is_sending() {
                    div { class: "typing-indicator visible", aria_label: "Pahiy yazıyor",
                        span {} span {} span {}
                    }
                }
            }
            Composer {}
        }
    }
}

#[component]
fn ChatHeader(title: String, show_settings: Signal<bool>, show_history: Signal<bool>) -> Element {
    let controller = use_controller();
    let state = *controller.state();
    let (mode, online, theme) = {
        let snapshot = state.read();
        (snapshot.mode, snapshot.online, snapshot.theme)
    };
    let theme_label = theme_definition(theme).label;
    let clearer = controller.clone();
    let themer = controller.clone();

    rsx! {
        header { class: "chat-header",
            div { class: "chat-title",
                h2 { "{title}" }
                if mode == ChatMode::Session {
                    span { class: if online { "status online" } else { "status offline" },
                        if online { "Çevrimiçi" } else { "Lokal mod" }
                    }
                }
            }
            div { class: "header-actions",
                if mode == ChatMode::Session {
                    button {
                        class: "icon-btn", r#type: "button", title: "Geçmiş",
                        onclick: move |_| show_history.set(true),
                        i { class: "fas fa-history" }
                    }
                }
                button {
                    class: "icon-btn", r#type: "button", title: "Sohbeti temizle",
                    onclick: move |_| {
                        let controller = clearer.clone();
                        spawn(async move { controller.clear_conversation().await });
                    },
                    i { class: "fas fa-broom" }
                }
                button {
                    class: "icon-btn", r#type: "button", title: "Tema: {theme_label}",
                    onclick: move |_| themer.cycle_theme(),
                    i { class: "fas fa-palette" }
                }
                button {
                    class: "icon-btn", r#type: "button", title: "Ayarlar",
                    onclick: move |_| show_settings.set(true),
                    i { class: "fas fa-cog" }
                }
            }
        }
    }
}

#[component]
fn Welcome(name: String, mode: ChatMode) -> Element {
    let heading = match mode {
        ChatMode::MultiChat => format!("Merhaba {name}!"),
        ChatMode::Session => "Merhaba! Ben Pahiy AI".to_string(),
    };
    rsx! {
        div { class: "welcome-message",
            div { class: "welcome-icon", "🤖" }
            h2 { "{heading}" }
            p { class: "text-muted",
                if mode == ChatMode::MultiChat {
                    "Yeni bir sohbet başlatın veya soldan bir sohbet seçin."
                } else {
                    "Size nasıl yardımcı olabilirim? Aşağıya bir mesaj yazın."
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> Element {
    let time = message_time(message.timestamp.as_deref());
    let role_class = message.role.css_class();
    let offline_class = if message.offline { "offline" } else { "" };

    rsx! {
        div { class: "message {role_class} {offline_class}",
            div { class: "message-content",
                if let Some(html) = message_html(&message) {
                    div { dangerous_inner_html: "{html}" }
                } else {
                    for (index, segment) in segment_reply(&message.content).into_iter().enumerate() {
                        {match segment {
                            Segment::Html(html) => rsx! { div { key: "{index}", dangerous_inner_html: "{html}" } },
                            Segment::Code { language, display, original } => rsx! {
                                CodeBlock { key: "{index}", language, display, original }
                            },
                        }}
                    }
                }
            }
            div { class: "message-time", "{time}" }
        }
    }
}

#[component]
fn CodeBlock(language: String, display: String, original: String) -> Element {
    let controller = use_controller();
    let mut manual = use_signal(|| Option::<String>::None);
    let selection_id = use_hook(|| format!("manual-copy-{}", rand::random::<u32>()));
    let copy_id = selection_id.clone();

    let copy = move |_| {
        let controller = controller.clone();
        let original = original.clone();
        let copy_id = copy_id.clone();
        spawn(async move {
            match copy_code_block(controller, original).await {
                CopyOutcome::Copied(_) => manual.set(None),
                CopyOutcome::ManualSelection(text) => {
                    debug!("clipboard refused, showing text for manual copy");
                    manual.set(Some(text));
                    select_element(&copy_id);
                }
            }
        });
    };

    rsx! {
        div { class: "code-block",
            div { class: "code-header",
                span { class: "language", "{language}" }
                button { class: "copy-btn", r#type: "button", onclick: copy,
                    i { class: "fas fa-copy" }
                    " Kopyala"
                }
            }
            pre { code { dangerous_inner_html: "{display}" } }
            if let Some(text) = manual() {
                textarea {
                    id: "{selection_id}",
                    class: "manual-copy",
                    readonly: true,
                    value: "{text}",
                }
            }
        }
    }
}

#[component]
fn Composer() -> Element {
    let controller = use_controller();
    let state = *controller.state();
    let mut input = use_signal(String::new);

    let send = use_callback(move |text: String| {
        let ready = state.with(|state| !state.is_sending() && state.current_scope().is_some());
        if text.trim().is_empty() {
            return;
        }
        if ready {
            input.set(String::new());
        }
        let controller = controller.clone();
        spawn(async move {
            if let Err(blocked) = controller.send_message(&text).await {
                debug!(?blocked, "send not started");
            }
        });
    });

    let sending = state.read().is_sending();
    let count = char_count(&input.read());
    let counter_color = CharCountLevel::for_count(count).color_var();

    rsx! {
        form {
            class: "composer",
            onsubmit: move |ev: FormEvent| {
                ev.prevent_default();
                send.call(input());
            },
            div { class: "quick-actions",
                for action in QuickAction::ALL {
                    button {
                        key: "{action.key()}",
                        class: "quick-action",
                        r#type: "button",
                        onclick: move |_| input.set(action.prompt().to_string()),
                        "{action.icon()} {action.label()}"
                    }
                }
            }
            div { class: "composer-inner",
                textarea {
                    id: "messageInput",
                    rows: "1",
                    placeholder: "Mesajınızı yazın...",
                    value: "{input}",
                    disabled: sending,
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send.call(input());
                        }
                    },
                }
                span { class: "char-count", style: "color: {counter_color}", "{count}" }
                button {
                    class: "btn btn-primary send-btn",
                    r#type: "submit",
                    disabled: sending || input().trim().is_empty(),
                    title: "Gönder",
                    i { class: "fas fa-paper-plane" }
                }
            }
        }
    }
}
