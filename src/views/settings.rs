use crate::config::ChatMode;
use crate::settings::SettingKey;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::ui::use_controller;
use crate::validation::ChangePasswordForm;
use crate::views::shared::Modal;
use dioxus::prelude::*;

const THEMES: [ThemeMode; 3] = [ThemeMode::Dark, ThemeMode::Light, ThemeMode::Auto];

#[component]
pub fn SettingsModal(open: Signal<bool>) -> Element {
    let controller = use_controller();
    let (theme, settings) = {
        let state = controller.state().read();
        (state.theme, state.settings.clone())
    };
    let multi_chat = controller.config().chat_mode == ChatMode::MultiChat;

    rsx! {
        Modal { open, title: "Ayarlar".to_string(),
            div { class: "settings-section",
                h3 { class: "section-title", "Tema" }
                div { class: "theme-toggle",
                    for mode in THEMES {
                        button {
                            key: "{theme_definition(mode).label}",
                            class: if theme == mode { "theme-option active" } else { "theme-option" },
                            r#type: "button",
                            onclick: {
                                let controller = controller.clone();
                                move |_| controller.set_theme(mode)
                            },
                            "{theme_definition(mode).label}"
                        }
                    }
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Arayüz" }
                for key in SettingKey::ALL {
                    label { key: "{key.label()}", class: "setting-toggle",
                        span { "{key.label()}" }
                        input {
                            r#type: "checkbox",
                            checked: settings.get(key),
                            onchange: {
                                let controller = controller.clone();
                                move |_| controller.toggle_setting(key)
                            },
                        }
                    }
                }
            }
            if multi_chat {
                div { class: "settings-section",
                    h3 { class: "section-title", "Şifre Değiştir" }
                    PasswordForm {}
                }
            }
        }
    }
}

#[component]
fn PasswordForm() -> Element {
    let controller = use_controller();
    let mut old_password = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut new_password_confirm = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let submit = move |ev: FormEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let form = ChangePasswordForm {
            old_password: old_password(),
            new_password: new_password(),
            new_password_confirm: new_password_confirm(),
        };
        let controller = controller.clone();
        error.set(None);
        busy.set(true);
        spawn(async move {
            match controller.change_password(&form).await {
                Ok(_) => {
                    old_password.set(String::new());
                    new_password.set(String::new());
                    new_password_confirm.set(String::new());
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        form { class: "password-form", onsubmit: submit,
            input {
                r#type: "password",
                placeholder: "Mevcut şifre",
                autocomplete: "current-password",
                value: "{old_password}",
                oninput: move |ev| old_password.set(ev.value()),
            }
            input {
                r#type: "password",
                placeholder: "Yeni şifre",
                autocomplete: "new-password",
                value: "{new_password}",
                oninput: move |ev| new_password.set(ev.value()),
            }
            input {
                r#type: "password",
                placeholder: "Yeni şifre (tekrar)",
                autocomplete: "new-password",
                value: "{new_password_confirm}",
                oninput: move |ev| new_password_confirm.set(ev.value()),
            }
            if let Some(message) = error() {
                div { class: "form-error", role: "alert", "{message}" }
            }
            button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                if busy() { "Kaydediliyor..." } else { "Şifreyi Değiştir" }
            }
        }
    }
}
