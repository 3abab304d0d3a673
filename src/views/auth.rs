use crate::auth::{AuthOutcome, FormError};
use crate::ui::use_controller;
use crate::validation::{LoginForm, RegisterForm};
use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthTab {
    Login,
    Register,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingVerification {
    email: String,
    message: String,
}

fn verification_from(result: &Result<AuthOutcome, FormError>) -> Option<PendingVerification> {
    match result {
        Ok(AuthOutcome::VerificationRequired { email, message })
        | Err(FormError::VerificationRequired { email, message }) => Some(PendingVerification {
            email: email.clone(),
            message: message.clone(),
        }),
        _ => None,
    }
}

#[component]
pub fn AuthView() -> Element {
    let tab = use_signal(|| AuthTab::Login);
    let verification = use_signal(|| Option::<PendingVerification>::None);

    rsx! {
        div { class: "auth-container",
            div { class: "auth-card",
                div { class: "auth-brand",
                    h1 { "Pahiy AI" }
                    p { class: "text-muted", "Akıllı sohbet asistanınız" }
                }
                if let Some(pending) = verification() {
                    VerificationNotice { pending, verification, tab }
                } else {
                    div { class: "tabs",
                        AuthTabButton { tab, value: AuthTab::Login, label: "Giriş Yap" }
                        AuthTabButton { tab, value: AuthTab::Register, label: "Kayıt Ol" }
                    }
                    if tab() == AuthTab::Login {
                        LoginPanel { verification }
                    } else {
                        RegisterPanel { verification }
                    }
                }
            }
        }
    }
}

#[component]
fn AuthTabButton(tab: Signal<AuthTab>, value: AuthTab, label: &'static str) -> Element {
    let mut tab = tab;
    let class = if tab() == value { "tab active" } else { "tab" };
    rsx! {
        button {
            class: class,
            r#type: "button",
            onclick: move |_| tab.set(value),
            "{label}"
        }
    }
}

#[component]
fn Field(
    label: &'static str,
    kind: &'static str,
    value: Signal<String>,
    autocomplete: &'static str,
) -> Element {
    let mut value = value;
    rsx! {
        label { class: "field",
            span { class: "field-label", "{label}" }
            input {
                r#type: kind,
                autocomplete: autocomplete,
                value: "{value}",
                oninput: move |ev| value.set(ev.value()),
            }
        }
    }
}

#[component]
fn ErrorBanner(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            div { class: "form-error", role: "alert",
                i { class: "fas fa-exclamation-circle" }
                span { "{message}" }
            }
        }
    }
}

#[component]
fn LoginPanel(verification: Signal<Option<PendingVerification>>) -> Element {
    let controller = use_controller();
    let login = use_signal(String::new);
    let password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let submit = move |ev: FormEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let form = LoginForm {
            login: login(),
            password: password(),
        };
        let controller = controller.clone();
        let mut verification = verification;
        error.set(None);
        busy.set(true);
        spawn(async move {
            let result = controller.login(&form).await;
            if let Some(pending) = verification_from(&result) {
                verification.set(Some(pending));
            } else if let Err(err) = result {
                error.set(Some(err.to_string()));
            }
            busy.set(false);
        });
    };

    rsx! {
        form { class: "auth-form", onsubmit: submit,
            Field { label: "Kullanıcı adı veya email", kind: "text", value: login, autocomplete: "username" }
            Field { label: "Şifre", kind: "password", value: password, autocomplete: "current-password" }
            ErrorBanner { message: error() }
            button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                if busy() {
                    div { class: "spinner" }
                    "Giriş yapılıyor..."
                } else {
                    i { class: "fas fa-sign-in-alt" }
                    " Giriş Yap"
                }
            }
        }
    }
}

#[component]
fn RegisterPanel(verification: Signal<Option<PendingVerification>>) -> Element {
    let controller = use_controller();
    let first_name = use_signal(String::new);
    let last_name = use_signal(String::new);
    let username = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let password_confirm = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let submit = move |ev: FormEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let form = RegisterForm {
            first_name: first_name(),
            last_name: last_name(),
            username: username(),
            email: email(),
            password: password(),
            password_confirm: password_confirm(),
        };
        let controller = controller.clone();
        let mut verification = verification;
        error.set(None);
        busy.set(true);
        spawn(async move {
            let result = controller.register(&form).await;
            if let Some(pending) = verification_from(&result) {
                verification.set(Some(pending));
            } else if let Err(err) = result {
                error.set(Some(err.to_string()));
            }
            busy.set(false);
        });
    };

    rsx! {
        form { class: "auth-form", onsubmit: submit,
            div { class: "field-row",
                Field { label: "Ad", kind: "text", value: first_name, autocomplete: "given-name" }
                Field { label: "Soyad", kind: "text", value: last_name, autocomplete: "family-name" }
            }
            Field { label: "Kullanıcı adı", kind: "text", value: username, autocomplete: "username" }
            Field { label: "Email", kind: "email", value: email, autocomplete: "email" }
            Field { label: "Şifre", kind: "password", value: password, autocomplete: "new-password" }
            Field { label: "Şifre (tekrar)", kind: "password", value: password_confirm, autocomplete: "new-password" }
            ErrorBanner { message: error() }
            button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                if busy() {
                    div { class: "spinner" }
                    "Kayıt yapılıyor..."
                } else {
                    i { class: "fas fa-user-plus" }
                    " Kayıt Ol"
                }
            }
        }
    }
}

#[component]
fn VerificationNotice(
    pending: PendingVerification,
    verification: Signal<Option<PendingVerification>>,
    tab: Signal<AuthTab>,
) -> Element {
    let controller = use_controller();
    let mut status = use_signal(|| Option::<Result<String, String>>::None);
    let mut busy = use_signal(|| false);
    let email = pending.email.clone();

    let resend = move |_| {
        if busy() {
            return;
        }
        let controller = controller.clone();
        let email = email.clone();
        busy.set(true);
        spawn(async move {
            let result = controller
                .resend_verification(&email)
                .await
                .map_err(|err| err.to_string());
            status.set(Some(result));
            busy.set(false);
        });
    };

    let mut verification = verification;
    let mut tab = tab;

    rsx! {
        div { class: "verification-notice",
            i { class: "fas fa-envelope-open-text" }
            p { "{pending.message}" }
            if !pending.email.is_empty() {
                p { class: "text-muted", "{pending.email}" }
            }
            {match status() {
                Some(Ok(message)) => rsx! { div { class: "form-success", "{message}" } },
                Some(Err(message)) => rsx! { ErrorBanner { message: Some(message) } },
                None => rsx! {},
            }}
            button { class: "btn btn-secondary", r#type: "button", disabled: busy(), onclick: resend,
                "Doğrulama emailini tekrar gönder"
            }
            button { class: "btn btn-link", r#type: "button", onclick: move |_| {
                    verification.set(None);
                    tab.set(AuthTab::Login);
                },
                "Giriş ekranına dön"
            }
        }
    }
}
