use crate::format::chat_date_label;
use crate::types::ChatSummary;
use crate::ui::use_controller;
use crate::views::shared::Modal;
use dioxus::events::Key;
use dioxus::prelude::*;

#[component]
pub fn Sidebar(show_settings: Signal<bool>) -> Element {
    let controller = use_controller();
    let state = *controller.state();
    let (chats, active, user_name, pending_delete) = {
        let snapshot = state.read();
        (
            snapshot.chats.clone(),
            snapshot.active_chat.clone(),
            snapshot.greeting_name(),
            snapshot.pending_delete.clone(),
        )
    };
    let creator = controller.clone();
    let leaver = controller.clone();
    let mut menu_open = use_signal(|| false);

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-header",
                button {
                    class: "btn btn-primary new-chat-btn",
                    r#type: "button",
                    onclick: move |_| {
                        let controller = creator.clone();
                        spawn(async move { controller.create_chat().await });
                    },
                    i { class: "fas fa-plus" }
                    " Yeni Sohbet"
                }
            }
            nav { class: "chat-list",
                if chats.is_empty() {
                    p { class: "text-muted empty-list", "Henüz sohbet yok" }
                }
                for chat in chats {
                    ChatItem {
                        key: "{chat.id}",
                        active: active.as_deref() == Some(chat.id.as_str()),
                        chat: chat.clone(),
                    }
                }
            }
            div { class: "sidebar-footer",
                button {
                    class: "user-menu-btn",
                    r#type: "button",
                    onclick: move |_| menu_open.toggle(),
                    i { class: "fas fa-user-circle" }
                    span { "{user_name}" }
                }
                if menu_open() {
                    div { class: "user-menu",
                        button {
                            r#type: "button",
                            onclick: move |_| {
                                menu_open.set(false);
                                show_settings.set(true);
                            },
                            i { class: "fas fa-cog" }
                            " Ayarlar"
                        }
                        button {
                            r#type: "button",
                            onclick: move |_| {
                                menu_open.set(false);
                                let controller = leaver.clone();
                                spawn(async move { controller.logout().await });
                            },
                            i { class: "fas fa-sign-out-alt" }
                            " Çıkış Yap"
                        }
                    }
                }
            }
        }
        if pending_delete.is_some() {
            DeleteConfirm {}
        }
    }
}

#[component]
fn ChatItem(chat: ChatSummary, active: bool) -> Element {
    let controller = use_controller();
    let mut editing = use_signal(|| false);
    let mut draft = use_signal(String::new);
    let date = chat_date_label(chat.updated_at.as_deref().or(chat.created_at.as_deref()));

    let select_id = chat.id.clone();
    let selector = controller.clone();
    let delete_id = chat.id.clone();
    let deleter = controller.clone();
    let rename_id = chat.id.clone();
    let title = chat.title.clone();

    let mut commit = move || {
        editing.set(false);
        let controller = controller.clone();
        let chat_id = rename_id.clone();
        let title = draft();
        spawn(async move { controller.rename_chat(&chat_id, &title).await });
    };

    rsx! {
        div { class: if active { "chat-item active" } else { "chat-item" },
            if editing() {
                input {
                    class: "rename-input",
                    value: "{draft}",
                    autofocus: true,
                    oninput: move |ev| draft.set(ev.value()),
                    onkeydown: move |ev| match ev.key() {
                        Key::Enter => commit(),
                        Key::Escape => editing.set(false),
                        _ => {}
                    },
                }
            } else {
                div {
                    class: "chat-item-body",
                    onclick: move |_| {
                        let controller = selector.clone();
                        let chat_id = select_id.clone();
                        spawn(async move { controller.select_chat(&chat_id).await });
                    },
                    span { class: "chat-item-title", "{chat.title}" }
                    span { class: "chat-item-date", "{date}" }
                }
                div { class: "chat-item-actions",
                    button {
                        class: "icon-btn",
                        r#type: "button",
                        title: "Yeniden adlandır",
                        onclick: move |ev| {
                            ev.stop_propagation();
                            draft.set(title.clone());
                            editing.set(true);
                        },
                        i { class: "fas fa-pen" }
                    }
                    button {
                        class: "icon-btn danger",
                        r#type: "button",
                        title: "Sil",
                        onclick: move |ev| {
                            ev.stop_propagation();
                            deleter.request_delete(&delete_id);
                        },
                        i { class: "fas fa-trash" }
                    }
                }
            }
        }
    }
}

#[component]
fn DeleteConfirm() -> Element {
    let controller = use_controller();
    let mut open = use_signal(|| true);
    let closer = controller.clone();

    // Closing the modal cancels the delete.
    use_effect(move || {
        if !open() {
            closer.cancel_delete();
        }
    });

    rsx! {
        Modal { open, title: "Sohbeti Sil".to_string(),
            p { "Bu sohbeti silmek istediğinizden emin misiniz? Bu işlem geri alınamaz." }
            div { class: "modal-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| open.set(false),
                    "İptal"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| {
                        let controller = controller.clone();
                        spawn(async move { controller.confirm_delete().await });
                    },
                    "Sil"
                }
            }
        }
    }
}
