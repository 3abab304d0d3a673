use crate::chat::Notification;
use crate::clipboard::CopyOutcome;
use crate::sound::SoundCue;
use crate::ui::{AppController, use_controller};
use dioxus::prelude::*;
use std::time::Duration;

pub const NOTICE_LIFETIME: Duration = Duration::from_secs(3);

pub async fn sleep(duration: Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}

pub fn play_cue(cue: SoundCue) {
    let _ = document::eval(&cue.script());
}

/// Copy a code block's stored source and report the outcome.
#[cfg(target_arch = "wasm32")]
pub async fn copy_code_block(controller: AppController, original: String) -> CopyOutcome {
    let text = crate::clipboard::decode_code_block(&original);
    let script = crate::clipboard::browser_copy_script(&text);
    let outcome = match document::eval(&script).join::<bool>().await {
        Ok(true) => CopyOutcome::Copied(text),
        Ok(false) => CopyOutcome::ManualSelection(text),
        Err(err) => {
            tracing::warn!("clipboard script failed: {err:?}");
            CopyOutcome::ManualSelection(text)
        }
    };
    controller.record_copy(&outcome);
    outcome
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn copy_code_block(controller: AppController, original: String) -> CopyOutcome {
    controller.copy_code(&mut crate::clipboard::SystemClipboard, &original)
}

/// Hand the exported conversation to the user.
pub fn deliver_export(controller: &AppController) {
    let (file_name, json) = match controller.export_conversation() {
        Ok(export) => export,
        Err(err) => {
            tracing::error!("failed to encode conversation: {err}");
            return;
        }
    };
    #[cfg(target_arch = "wasm32")]
    {
        let script = crate::chat::history::browser_download_script(&file_name, &json);
        let _ = document::eval(&script);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let fallback = controller
            .config()
            .storage_dir
            .clone()
            .unwrap_or_else(crate::storage::FileStore::default_dir);
        if let Err(err) = crate::chat::history::write_export(&file_name, &json, &fallback) {
            tracing::error!("export failed: {err:#}");
            use crate::chat::StateHandle;
            controller.state().with_state_mut(|state| {
                state.notify(crate::chat::NoticeKind::Error, format!("Dışa aktarılamadı: {err}"));
            });
        }
    }
}

/// Select the contents of an element so the user can copy by hand.
pub fn select_element(id: &str) {
    let id = serde_json::to_string(id).unwrap_or_default();
    let _ = document::eval(&format!(
        "const el = document.getElementById({id}); if (el) {{ el.focus(); el.select(); }}"
    ));
}

#[component]
pub fn Notifications() -> Element {
    let controller = use_controller();
    let notices = controller.state().read().notifications.clone();
    rsx! {
        div { class: "notification-stack",
            for notice in notices {
                NotificationToast { key: "{notice.id}", notice: notice.clone() }
            }
        }
    }
}

#[component]
fn NotificationToast(notice: Notification) -> Element {
    let controller = use_controller();
    let id = notice.id;
    let timer = controller.clone();
    use_hook(move || {
        spawn(async move {
            sleep(NOTICE_LIFETIME).await;
            timer.dismiss(id);
        })
    });
    rsx! {
        div {
            class: "notification {notice.kind.css_class()}",
            role: "status",
            onclick: move |_| controller.dismiss(id),
            i { class: "fas fa-{notice.kind.icon()}" }
            span { "{notice.message}" }
        }
    }
}

#[component]
pub fn Modal(open: Signal<bool>, title: String, children: Element) -> Element {
    let mut open = open;
    rsx! {
        div { class: "modal-backdrop", onclick: move |_| open.set(false),
            div {
                class: "modal",
                role: "dialog",
                onclick: move |ev| ev.stop_propagation(),
                div { class: "modal-header",
                    h3 { "{title}" }
                    button {
                        class: "icon-btn",
                        r#type: "button",
                        title: "Kapat",
                        onclick: move |_| open.set(false),
                        "✕"
                    }
                }
                div { class: "modal-body", {children} }
            }
        }
    }
}
