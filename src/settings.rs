use crate::session::generate_session_id;
use crate::storage::{KeyValueStore, PREFERENCES_KEY, SETTINGS_KEY, StorageError, get_json, set_json};
use crate::types::ThemeMode;
use serde::{Deserialize, Serialize};

fn enabled() -> bool {
    true
}

/// Presentation toggles. Every flag reads as on until the user turns it off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    #[serde(default = "enabled")]
    pub animations: bool,
    #[serde(default = "enabled")]
    pub sounds: bool,
    #[serde(default = "enabled")]
    pub auto_scroll: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            animations: true,
            sounds: true,
            auto_scroll: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    Animations,
    Sounds,
    AutoScroll,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [Self::Animations, Self::Sounds, Self::AutoScroll];

    pub fn label(self) -> &'static str {
        match self {
            Self::Animations => "Animasyonlar",
            Self::Sounds => "Sesler",
            Self::AutoScroll => "Otomatik scroll",
        }
    }

    pub fn toggled_notice(self, on: bool) -> String {
        let state = if on { "açıldı" } else { "kapatıldı" };
        format!("{} {state}", self.label())
    }
}

impl UiSettings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        get_json(store, SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        set_json(store, SETTINGS_KEY, self)
    }

    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Animations => self.animations,
            SettingKey::Sounds => self.sounds,
            SettingKey::AutoScroll => self.auto_scroll,
        }
    }

    pub fn set(&mut self, key: SettingKey, on: bool) {
        match key {
            SettingKey::Animations => self.animations = on,
            SettingKey::Sounds => self.sounds = on,
            SettingKey::AutoScroll => self.auto_scroll = on,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Option<ThemeMode>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        get_json(store, PREFERENCES_KEY).unwrap_or_default()
    }

    /// Load preferences, minting and persisting a session id on first run.
    pub fn load_or_init(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let mut prefs = Self::load(store);
        if prefs.session_id.is_none() {
            prefs.session_id = Some(generate_session_id());
            prefs.save(store)?;
        }
        Ok(prefs)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        set_json(store, PREFERENCES_KEY, self)
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme.unwrap_or_default()
    }
}
