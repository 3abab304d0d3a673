//! Runtime configuration read from the process environment.
//!
//! Desktop builds pick up a `.env` file first; every build falls back to the
//! bundled `assets/config.env`. Values already present in the environment win.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Bundled config for web and mobile builds
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[cfg(not(target_arch = "wasm32"))]
pub fn load_environment() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_environment() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        if env::var(key).is_err() {
            // SAFETY: called from main before the runtime or any threads start
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(source: &str) -> Vec<(&str, &str)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Whether conversations are scoped to backend chats or to a local session id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatMode {
    #[default]
    MultiChat,
    Session,
}

impl FromStr for ChatMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "multi" | "multi-chat" | "chats" => Ok(Self::MultiChat),
            "session" => Ok(Self::Session),
            other => bail!("unknown chat mode '{other}' (expected 'multi' or 'session')"),
        }
    }
}

/// How register and login success responses are interpreted.
///
/// Backends in the wild either hand out a token immediately or require the
/// user to verify their email first; which one applies is a deployment choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthFlow {
    /// Success responses must carry `token` and `user`.
    Token,
    /// Registration ends with an email verification step.
    Verification,
    /// Honor whichever shape the backend returns.
    #[default]
    Auto,
}

impl FromStr for AuthFlow {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "token" | "immediate" => Ok(Self::Token),
            "verification" | "verify" | "email" => Ok(Self::Verification),
            "auto" | "" => Ok(Self::Auto),
            other => bail!("unknown auth flow '{other}' (expected token, verification or auto)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub chat_mode: ChatMode,
    pub auth_flow: AuthFlow,
    pub log_level: tracing::Level,
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            chat_mode: ChatMode::default(),
            auth_flow: AuthFlow::default(),
            log_level: tracing::Level::INFO,
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("BACKEND_URL").filter(|url| !url.trim().is_empty()) {
            config.backend_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(mode) = lookup("CHAT_MODE") {
            config.chat_mode = mode.parse().context("invalid CHAT_MODE")?;
        }
        if let Some(flow) = lookup("AUTH_FLOW") {
            config.auth_flow = flow.parse().context("invalid AUTH_FLOW")?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = tracing::Level::from_str(level.trim())
                .map_err(|err| anyhow::anyhow!("{err}"))
                .context("invalid LOG_LEVEL")?;
        }
        config.storage_dir = lookup("STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BACKEND_URL", "https://chat.example.com/"),
            ("CHAT_MODE", "session"),
            ("AUTH_FLOW", "verification"),
            ("LOG_LEVEL", "debug"),
            ("STORAGE_DIR", "/tmp/pahiy"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "https://chat.example.com");
        assert_eq!(config.chat_mode, ChatMode::Session);
        assert_eq!(config.auth_flow, AuthFlow::Verification);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/pahiy")));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("CHAT_MODE", "group")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("AUTH_FLOW", "magic")])).is_err());
    }

    #[test]
    fn bundled_config_lines_parse() {
        let pairs = parse_env_lines("# comment\n\nBACKEND_URL = http://x\nBROKEN\nA=b=c\n");
        assert_eq!(pairs, vec![("BACKEND_URL", "http://x"), ("A", "b=c")]);
    }
}
