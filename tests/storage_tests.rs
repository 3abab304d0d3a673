//! Integration tests for the on-disk key-value store
//!
//! Credentials, settings and preferences written through `FileStore` must
//! survive a fresh store instance pointed at the same directory.

use pahiy::auth;
use pahiy::settings::{Preferences, UiSettings};
use pahiy::storage::{AUTH_TOKEN_KEY, FileStore, KeyValueStore, get_json, set_json};
use pahiy::types::{ThemeMode, User};

fn user() -> User {
    User {
        id: 3,
        first_name: "Elif".into(),
        last_name: "Kaya".into(),
        username: "elif".into(),
        email: "elif@example.com".into(),
    }
}

mod file_store {
    use super::*;

    #[test]
    fn test_set_get_and_remove() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.set(AUTH_TOKEN_KEY, "abc").expect("Failed to set");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("abc"));

        store.remove(AUTH_TOKEN_KEY).expect("Failed to remove");
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.remove("never_written").expect("Removing a missing key");
    }

    #[test]
    fn test_creates_directory_on_first_write() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let nested = dir.path().join("pahiy").join("local_storage");
        let store = FileStore::new(&nested);

        store.set("theme", "\"light\"").expect("Failed to set");
        assert!(nested.is_dir());
    }

    #[test]
    fn test_special_characters_in_key() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());
        let key = "user:preferences/theme";

        store.set(key, "dark").expect("Failed to set");

        assert_eq!(store.get(key).as_deref(), Some("dark"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("Failed to list dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["user_preferences_theme.json".to_string()]);
    }
}

mod persistence {
    use super::*;

    #[test]
    fn test_credentials_survive_a_new_store() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        auth::persist_credentials(&FileStore::new(dir.path()), "tok", &user())
            .expect("Failed to persist");

        let reopened = FileStore::new(dir.path());
        assert_eq!(auth::stored_token(&reopened).as_deref(), Some("tok"));
        assert_eq!(auth::stored_user(&reopened), Some(user()));

        auth::clear_credentials(&reopened);
        assert_eq!(auth::stored_token(&FileStore::new(dir.path())), None);
    }

    #[test]
    fn test_settings_and_preferences_survive_a_new_store() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());
        let settings = UiSettings {
            animations: false,
            ..UiSettings::default()
        };
        settings.save(&store).expect("Failed to save settings");
        let prefs = Preferences::load_or_init(&store).expect("Failed to init preferences");
        let session_id = prefs.session_id.clone();
        Preferences {
            theme: Some(ThemeMode::Auto),
            ..prefs
        }
        .save(&store)
        .expect("Failed to save preferences");

        let reopened = FileStore::new(dir.path());
        assert_eq!(UiSettings::load(&reopened), settings);
        let prefs = Preferences::load(&reopened);
        assert_eq!(prefs.theme(), ThemeMode::Auto);
        assert_eq!(prefs.session_id, session_id);
    }

    #[test]
    fn test_json_helpers_skip_unreadable_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.set("numbers", "[1, 2,").expect("Failed to set");
        assert_eq!(get_json::<Vec<u32>>(&store, "numbers"), None);

        set_json(&store, "numbers", &vec![1u32, 2]).expect("Failed to set json");
        assert_eq!(get_json::<Vec<u32>>(&store, "numbers"), Some(vec![1, 2]));
    }
}
