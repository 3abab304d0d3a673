use crate::chat::history::highlight;
use crate::format::message_time;
use crate::types::{ChatMessage, Role};
use crate::ui::use_controller;
use crate::views::shared::{Modal, deliver_export};
use dioxus::prelude::*;

fn preview(message: &ChatMessage, query: &str) -> String {
    highlight(&message.content, query)
}

#[component]
pub fn HistoryModal(open: Signal<bool>) -> Element {
    let controller = use_controller();
    let state = *controller.state();
    let mut query = use_signal(String::new);
    let mut results = use_signal(|| Option::<Vec<(usize, ChatMessage)>>::None);

    let loader = controller.clone();
    use_hook(move || {
        spawn(async move { loader.load_history().await });
    });

    let entries: Vec<(usize, ChatMessage)> = match results() {
        Some(hits) => hits,
        None => state.read().messages.iter().cloned().enumerate().collect(),
    };
    let searcher = controller.clone();
    let exporter = controller.clone();
    let clearer = controller.clone();

    rsx! {
        Modal { open, title: "Konuşma Geçmişi".to_string(),
            form {
                class: "history-search",
                onsubmit: move |ev: FormEvent| {
                    ev.prevent_default();
                    if query().trim().is_empty() {
                        results.set(None);
                    } else {
                        results.set(Some(searcher.search_history(&query())));
                    }
                },
                input {
                    r#type: "search",
                    placeholder: "Geçmişte ara...",
                    value: "{query}",
                    oninput: move |ev| {
                        if ev.value().trim().is_empty() {
                            results.set(None);
                        }
                        query.set(ev.value());
                    },
                }
                button { class: "btn btn-secondary", r#type: "submit",
                    i { class: "fas fa-search" }
                }
            }
            if entries.is_empty() {
                p { class: "text-muted empty-list", "Geçmiş boş" }
            }
            ul { class: "history-list",
                for (index, message) in entries {
                    li {
                        key: "{index}",
                        class: "history-item {message.role.css_class()}",
                        div { class: "history-meta",
                            span { if message.role == Role::User { "Siz" } else { "Pahiy" } }
                            span { class: "text-muted", "{message_time(message.timestamp.as_deref())}" }
                        }
                        div {
                            class: "history-text",
                            dangerous_inner_html: "{preview(&message, &query())}",
                        }
                        button {
                            class: "icon-btn danger",
                            r#type: "button",
                            title: "Sil",
                            onclick: {
                                let controller = controller.clone();
                                move |_| {
                                    controller.delete_history_item(index);
                                    results.set(None);
                                }
                            },
                            i { class: "fas fa-trash" }
                        }
                    }
                }
            }
            div { class: "modal-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| deliver_export(&exporter),
                    i { class: "fas fa-file-export" }
                    " Dışa Aktar"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| {
                        let controller = clearer.clone();
                        results.set(None);
                        spawn(async move { controller.clear_memory().await });
                    },
                    i { class: "fas fa-trash-alt" }
                    " Hafızayı Temizle"
                }
            }
        }
    }
}
