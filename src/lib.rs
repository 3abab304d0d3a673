//! Pahiy chat client.
//!
//! The core (everything outside `ui` and `views`) is renderer-free and runs
//! under plain `cargo test`. The Dioxus front end is behind the `ui` feature.

pub mod api;
pub mod auth;
pub mod chat;
pub mod clipboard;
pub mod config;
pub mod fallback;
pub mod format;
pub mod session;
pub mod settings;
pub mod sound;
pub mod storage;
pub mod theme;
pub mod types;
pub mod validation;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
