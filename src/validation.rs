//! Client-side form checks.
//!
//! These are conveniences for the user, not a security boundary: the backend
//! validates everything again.

use crate::api::{ChangePasswordRequest, LoginRequest, RegisterRequest, ResendVerificationRequest};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MSG_FILL_ALL: &str = "Tüm alanları doldurun";
pub const MSG_FIRST_NAME: &str = "Geçerli bir ad giriniz (en az 2 harf)";
pub const MSG_LAST_NAME: &str = "Geçerli bir soyad giriniz (en az 2 harf)";
pub const MSG_USERNAME_LENGTH: &str = "Kullanıcı adı 3-20 karakter olmalıdır";
pub const MSG_USERNAME_CHARSET: &str = "Kullanıcı adı sadece harf, rakam ve _ içerebilir";
pub const MSG_EMAIL: &str = "Geçerli bir email giriniz";
pub const MSG_PASSWORD_MISMATCH: &str = "Şifreler eşleşmiyor";
pub const MSG_PASSWORD_SHORT: &str = "Şifre en az 6 karakter olmalıdır";
pub const MSG_NEW_PASSWORD_MISMATCH: &str = "Yeni şifreler eşleşmiyor";
pub const MSG_NEW_PASSWORD_SHORT: &str = "Yeni şifre en az 6 karakter olmalıdır";

const MIN_NAME_CHARS: usize = 2;
const USERNAME_CHARS: std::ops::RangeInclusive<usize> = 3..=20;
const MIN_PASSWORD_CHARS: usize = 6;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZçÇğĞıİöÖşŞüÜ\s]+$").expect("valid name pattern"));
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// A check failed; the payload is the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

pub type Validated<T> = Result<T, ValidationError>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn ensure(condition: bool, message: &'static str) -> Validated<()> {
    if condition {
        Ok(())
    } else {
        Err(ValidationError(message))
    }
}

pub fn is_valid_name(name: &str) -> bool {
    char_len(name) >= MIN_NAME_CHARS && NAME_RE.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl LoginForm {
    /// Passwords are sent as typed; only the login field is trimmed.
    pub fn validate(&self) -> Validated<LoginRequest> {
        let login = self.login.trim();
        ensure(!login.is_empty() && !self.password.is_empty(), MSG_FILL_ALL)?;
        Ok(LoginRequest {
            login: login.to_string(),
            password: self.password.clone(),
        })
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Validated<RegisterRequest> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let username = self.username.trim();
        let email = self.email.trim();

        let fields = [
            first_name,
            last_name,
            username,
            email,
            self.password.as_str(),
            self.password_confirm.as_str(),
        ];
        ensure(fields.iter().all(|field| !field.is_empty()), MSG_FILL_ALL)?;
        ensure(is_valid_name(first_name), MSG_FIRST_NAME)?;
        ensure(is_valid_name(last_name), MSG_LAST_NAME)?;
        ensure(USERNAME_CHARS.contains(&char_len(username)), MSG_USERNAME_LENGTH)?;
        ensure(USERNAME_RE.is_match(username), MSG_USERNAME_CHARSET)?;
        ensure(is_valid_email(email), MSG_EMAIL)?;
        ensure(self.password == self.password_confirm, MSG_PASSWORD_MISMATCH)?;
        ensure(char_len(&self.password) >= MIN_PASSWORD_CHARS, MSG_PASSWORD_SHORT)?;

        Ok(RegisterRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Validated<ChangePasswordRequest> {
        ensure(
            self.new_password == self.new_password_confirm,
            MSG_NEW_PASSWORD_MISMATCH,
        )?;
        ensure(
            char_len(&self.new_password) >= MIN_PASSWORD_CHARS,
            MSG_NEW_PASSWORD_SHORT,
        )?;
        Ok(ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

pub fn validate_resend(email: &str) -> Validated<ResendVerificationRequest> {
    let email = email.trim();
    ensure(is_valid_email(email), MSG_EMAIL)?;
    Ok(ResendVerificationRequest {
        email: email.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterForm {
        RegisterForm {
            first_name: "Ayaz".into(),
            last_name: "Şahin".into(),
            username: "ayaz_42".into(),
            email: "ayaz@example.com".into(),
            password: "gizli123".into(),
            password_confirm: "gizli123".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            login: "abc".into(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError(MSG_FILL_ALL)));

        let form = LoginForm {
            login: "   ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError(MSG_FILL_ALL)));
    }

    #[test]
    fn login_trims_only_the_login_field() {
        let request = LoginForm {
            login: "  ayaz ".into(),
            password: " pw ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.login, "ayaz");
        assert_eq!(request.password, " pw ");
    }

    #[test]
    fn valid_registration_passes_through_trimmed_fields() {
        let mut form = valid_register();
        form.email = " ayaz@example.com ".into();
        let request = form.validate().unwrap();
        assert_eq!(request.first_name, "Ayaz");
        assert_eq!(request.last_name, "Şahin");
        assert_eq!(request.email, "ayaz@example.com");
        assert_eq!(request.password, "gizli123");
    }

    #[test]
    fn each_register_rule_reports_its_message() {
        let cases: Vec<(fn(&mut RegisterForm), &str)> = vec![
            (|f| f.username.clear(), MSG_FILL_ALL),
            (|f| f.password_confirm.clear(), MSG_FILL_ALL),
            (|f| f.first_name = "A".into(), MSG_FIRST_NAME),
            (|f| f.first_name = "Ay4z".into(), MSG_FIRST_NAME),
            (|f| f.last_name = "Ş".into(), MSG_LAST_NAME),
            (|f| f.username = "ab".into(), MSG_USERNAME_LENGTH),
            (|f| f.username = "a".repeat(21), MSG_USERNAME_LENGTH),
            (|f| f.username = "ayaz-42".into(), MSG_USERNAME_CHARSET),
            (|f| f.email = "ayaz@example".into(), MSG_EMAIL),
            (|f| f.email = "ay az@example.com".into(), MSG_EMAIL),
            (|f| f.password_confirm = "gizli124".into(), MSG_PASSWORD_MISMATCH),
            (
                |f| {
                    f.password = "kisa".into();
                    f.password_confirm = "kisa".into();
                },
                MSG_PASSWORD_SHORT,
            ),
        ];

        for (mutate, expected) in cases {
            let mut form = valid_register();
            mutate(&mut form);
            assert_eq!(form.validate(), Err(ValidationError(expected)), "{form:?}");
        }
    }

    #[test]
    fn turkish_letters_and_spaces_are_valid_names() {
        assert!(is_valid_name("Çağrı Ümit"));
        assert!(is_valid_name("İsmail"));
        assert!(!is_valid_name("Jean-Luc"));
    }

    #[test]
    fn change_password_rules() {
        let form = ChangePasswordForm {
            old_password: "eski".into(),
            new_password: "yenisifre".into(),
            new_password_confirm: "yenisifr".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError(MSG_NEW_PASSWORD_MISMATCH)));

        let form = ChangePasswordForm {
            old_password: "eski".into(),
            new_password: "12345".into(),
            new_password_confirm: "12345".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError(MSG_NEW_PASSWORD_SHORT)));
    }

    #[test]
    fn resend_checks_email_shape() {
        assert_eq!(validate_resend("nope"), Err(ValidationError(MSG_EMAIL)));
        assert_eq!(validate_resend(" a@b.co ").unwrap().email, "a@b.co");
    }
}
