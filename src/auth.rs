//! Login, registration and the stored-credential gate.
//!
//! Form flows validate locally first; invalid input never reaches the
//! backend. Each valid submission is exactly one request.

use crate::api::{ApiError, AuthResponse, ChatBackend};
use crate::config::AuthFlow;
use crate::storage::{AUTH_TOKEN_KEY, KeyValueStore, StorageError, USER_KEY, get_json, set_json};
use crate::types::User;
use crate::validation::{ChangePasswordForm, LoginForm, RegisterForm, ValidationError, validate_resend};
use tracing::{debug, info, warn};

pub const MSG_CONNECTION_RETRY: &str = "Bağlantı hatası. Lütfen tekrar deneyin.";
pub const MSG_LOGIN_FAILED: &str = "Giriş başarısız";
pub const MSG_REGISTER_FAILED: &str = "Kayıt başarısız";
pub const MSG_PASSWORD_FAILED: &str = "Şifre değiştirilemedi";
pub const MSG_ACTION_FAILED: &str = "İşlem başarısız";
pub const MSG_VERIFY_EMAIL: &str = "Lütfen email adresinizi kontrol edin ve doğrulama linkine tıklayın.";
pub const MSG_VERIFICATION_SENT: &str = "Doğrulama emaili gönderildi";
pub const MSG_PASSWORD_CHANGED: &str = "Şifre başarıyla değiştirildi!";

/// What the form shows when a submission does not sign the user in.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("{0}")]
    Server(String),

    #[error("{}", MSG_CONNECTION_RETRY)]
    Connection,

    #[error("{message}")]
    VerificationRequired { email: String, message: String },
}

impl From<ValidationError> for FormError {
    fn from(err: ValidationError) -> Self {
        FormError::Invalid(err.0)
    }
}

impl FormError {
    /// Map a failed call, using `fallback` when the server sent no message.
    pub fn from_api(err: ApiError, fallback: &'static str) -> Self {
        match err {
            ApiError::Server {
                requires_verification: true,
                message,
                email,
                ..
            } => FormError::VerificationRequired {
                email: email.unwrap_or_default(),
                message: message.unwrap_or_else(|| MSG_VERIFY_EMAIL.to_string()),
            },
            ApiError::Server { message, .. } => {
                FormError::Server(message.unwrap_or_else(|| fallback.to_string()))
            }
            ApiError::Transport(_) | ApiError::Malformed(_) => FormError::Connection,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn { token: String, user: User },
    VerificationRequired { email: String, message: String },
}

/// Decide what a successful login/register body means under `flow`.
///
/// A body carrying both token and user always signs in. Without them the
/// verification and auto flows accept a verification notice; the token flow
/// treats the body as malformed.
pub fn interpret_auth_response(
    flow: AuthFlow,
    response: AuthResponse,
    submitted_email: &str,
) -> Result<AuthOutcome, FormError> {
    if let (Some(token), Some(user)) = (response.token, response.user) {
        return Ok(AuthOutcome::SignedIn { token, user });
    }
    let verification = match flow {
        AuthFlow::Token => false,
        AuthFlow::Verification => true,
        AuthFlow::Auto => response.requires_verification,
    };
    if verification {
        return Ok(AuthOutcome::VerificationRequired {
            email: response
                .email
                .unwrap_or_else(|| submitted_email.to_string()),
            message: response
                .message
                .unwrap_or_else(|| MSG_VERIFY_EMAIL.to_string()),
        });
    }
    warn!(?flow, "auth response carried neither credentials nor a verification notice");
    Err(FormError::from_api(
        ApiError::Malformed("missing token or user".into()),
        MSG_ACTION_FAILED,
    ))
}

pub async fn login<B: ChatBackend + ?Sized>(
    backend: &B,
    flow: AuthFlow,
    form: &LoginForm,
) -> Result<AuthOutcome, FormError> {
    let request = form.validate()?;
    let response = backend
        .login(&request)
        .await
        .map_err(|err| FormError::from_api(err, MSG_LOGIN_FAILED))?;
    interpret_auth_response(flow, response, &request.login)
}

pub async fn register<B: ChatBackend + ?Sized>(
    backend: &B,
    flow: AuthFlow,
    form: &RegisterForm,
) -> Result<AuthOutcome, FormError> {
    let request = form.validate()?;
    let response = backend
        .register(&request)
        .await
        .map_err(|err| FormError::from_api(err, MSG_REGISTER_FAILED))?;
    interpret_auth_response(flow, response, &request.email)
}

/// Returns the confirmation text to show.
pub async fn resend_verification<B: ChatBackend + ?Sized>(
    backend: &B,
    email: &str,
) -> Result<String, FormError> {
    let request = validate_resend(email)?;
    let response = backend
        .resend_verification(&request)
        .await
        .map_err(|err| FormError::from_api(err, MSG_ACTION_FAILED))?;
    Ok(response
        .message
        .unwrap_or_else(|| MSG_VERIFICATION_SENT.to_string()))
}

pub async fn change_password<B: ChatBackend + ?Sized>(
    backend: &B,
    token: &str,
    form: &ChangePasswordForm,
) -> Result<String, FormError> {
    let request = form.validate()?;
    let response = backend
        .change_password(token, &request)
        .await
        .map_err(|err| FormError::from_api(err, MSG_PASSWORD_FAILED))?;
    Ok(response
        .message
        .unwrap_or_else(|| MSG_PASSWORD_CHANGED.to_string()))
}

// ============================================
// Stored credential
// ============================================

pub fn stored_token(store: &dyn KeyValueStore) -> Option<String> {
    store.get(AUTH_TOKEN_KEY).filter(|token| !token.is_empty())
}

pub fn stored_user(store: &dyn KeyValueStore) -> Option<User> {
    get_json(store, USER_KEY)
}

pub fn persist_credentials(
    store: &dyn KeyValueStore,
    token: &str,
    user: &User,
) -> Result<(), StorageError> {
    store.set(AUTH_TOKEN_KEY, token)?;
    set_json(store, USER_KEY, user)
}

/// Remove the token and profile; failures are logged, never surfaced.
pub fn clear_credentials(store: &dyn KeyValueStore) {
    for key in [AUTH_TOKEN_KEY, USER_KEY] {
        if let Err(err) = store.remove(key) {
            warn!(key, "failed to remove stored credential: {err}");
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    NoCredential,
    Valid { token: String, user: User },
    /// The backend refused the token; it has been cleared.
    Rejected,
    /// The backend could not be reached; the token is kept.
    Unreachable,
}

/// One `GET /api/me` with the stored token. No retry.
pub async fn validate_stored_credential<B: ChatBackend + ?Sized>(
    backend: &B,
    store: &dyn KeyValueStore,
) -> GateOutcome {
    let Some(token) = stored_token(store) else {
        debug!("no stored credential");
        return GateOutcome::NoCredential;
    };
    match backend.me(&token).await {
        Ok(user) => {
            if let Err(err) = set_json(store, USER_KEY, &user) {
                warn!("failed to refresh stored profile: {err}");
            }
            GateOutcome::Valid { token, user }
        }
        Err(err) if err.is_transport() => {
            warn!("token validation failed: {err}");
            GateOutcome::Unreachable
        }
        Err(err) => {
            info!("stored credential rejected: {err}");
            clear_credentials(store);
            GateOutcome::Rejected
        }
    }
}

/// `POST /api/logout`, then drop the credential whatever the outcome.
pub async fn logout<B: ChatBackend + ?Sized>(backend: &B, store: &dyn KeyValueStore) {
    if let Some(token) = stored_token(store) {
        if let Err(err) = backend.logout(&token).await {
            warn!("logout request failed: {err}");
        }
    }
    clear_credentials(store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user() -> User {
        User {
            id: 7,
            first_name: "Ayaz".into(),
            last_name: "Demir".into(),
            username: "ayaz".into(),
            email: "ayaz@example.com".into(),
        }
    }

    #[test]
    fn token_and_user_sign_in_under_every_flow() {
        for flow in [AuthFlow::Token, AuthFlow::Verification, AuthFlow::Auto] {
            let response = AuthResponse {
                token: Some("t".into()),
                user: Some(user()),
                ..AuthResponse::default()
            };
            assert_eq!(
                interpret_auth_response(flow, response, "x@y.z"),
                Ok(AuthOutcome::SignedIn {
                    token: "t".into(),
                    user: user()
                })
            );
        }
    }

    #[test]
    fn verification_notice_depends_on_flow() {
        let response = AuthResponse {
            message: Some("Kayıt başarılı!".into()),
            requires_verification: true,
            ..AuthResponse::default()
        };
        assert_eq!(
            interpret_auth_response(AuthFlow::Auto, response.clone(), "a@b.co"),
            Ok(AuthOutcome::VerificationRequired {
                email: "a@b.co".into(),
                message: "Kayıt başarılı!".into()
            })
        );
        assert_eq!(
            interpret_auth_response(AuthFlow::Token, response, "a@b.co"),
            Err(FormError::Connection)
        );
        assert!(matches!(
            interpret_auth_response(AuthFlow::Verification, AuthResponse::default(), "a@b.co"),
            Ok(AuthOutcome::VerificationRequired { .. })
        ));
    }

    #[test]
    fn api_errors_map_to_form_errors() {
        assert_eq!(
            FormError::from_api(ApiError::Transport("down".into()), MSG_LOGIN_FAILED).to_string(),
            MSG_CONNECTION_RETRY
        );
        assert_eq!(
            FormError::from_api(ApiError::from_error_body(500, "{}"), MSG_REGISTER_FAILED),
            FormError::Server(MSG_REGISTER_FAILED.into())
        );
        assert_eq!(
            FormError::from_api(
                ApiError::from_error_body(
                    403,
                    r#"{"error":"doğrulanmamış","requiresVerification":true,"email":"a@b.co"}"#
                ),
                MSG_LOGIN_FAILED
            ),
            FormError::VerificationRequired {
                email: "a@b.co".into(),
                message: "doğrulanmamış".into()
            }
        );
    }

    #[test]
    fn credentials_round_trip_through_the_store() {
        let store = MemoryStore::new();
        assert_eq!(stored_token(&store), None);
        persist_credentials(&store, "tok", &user()).unwrap();
        assert_eq!(stored_token(&store).as_deref(), Some("tok"));
        assert_eq!(stored_user(&store), Some(user()));
        clear_credentials(&store);
        assert!(store.is_empty());
    }
}
