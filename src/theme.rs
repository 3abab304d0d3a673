use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub label: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            label: "Koyu",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            label: "Açık",
        },
        ThemeMode::Auto => ThemeDefinition {
            css: AUTO_THEME,
            label: "Otomatik",
        },
    }
}

/// dark -> light -> auto -> dark
pub fn next_theme(mode: ThemeMode) -> ThemeMode {
    match mode {
        ThemeMode::Dark => ThemeMode::Light,
        ThemeMode::Light => ThemeMode::Auto,
        ThemeMode::Auto => ThemeMode::Dark,
    }
}

pub fn activated_notice(mode: ThemeMode) -> String {
    format!("🎨 {} tema aktif", theme_definition(mode).label)
}

const DARK_THEME: &str = r#"
:root {
    --bg-primary: #0f0f14;
    --bg-secondary: #181820;
    --bg-overlay: rgba(0, 0, 0, 0.7);
    --text-primary: #f2f2f5;
    --text-muted: #9a9aa8;
    --border: #2a2a36;
    --accent: #7c5cff;
    --user-bubble: #7c5cff;
    --user-text: #ffffff;
    --ai-bubble: #1f1f2a;
    --ai-text: #f2f2f5;
    --success: #2ecc71;
    --warning: #f1c40f;
    --error: #e74c3c;
}
"#;

const LIGHT_THEME: &str = r#"
:root {
    --bg-primary: #ffffff;
    --bg-secondary: #f4f4f8;
    --bg-overlay: rgba(255, 255, 255, 0.85);
    --text-primary: #15151c;
    --text-muted: #5c5c6b;
    --border: #d8d8e2;
    --accent: #5a3dff;
    --user-bubble: #5a3dff;
    --user-text: #ffffff;
    --ai-bubble: #eeeef4;
    --ai-text: #15151c;
    --success: #1e9e57;
    --warning: #c79a00;
    --error: #c0392b;
}
"#;

const AUTO_THEME: &str = r#"
:root {
    --bg-primary: #0f0f14;
    --bg-secondary: #181820;
    --bg-overlay: rgba(0, 0, 0, 0.7);
    --text-primary: #f2f2f5;
    --text-muted: #9a9aa8;
    --border: #2a2a36;
    --accent: #7c5cff;
    --user-bubble: #7c5cff;
    --user-text: #ffffff;
    --ai-bubble: #1f1f2a;
    --ai-text: #f2f2f5;
    --success: #2ecc71;
    --warning: #f1c40f;
    --error: #e74c3c;
}
@media (prefers-color-scheme: light) {
    :root {
        --bg-primary: #ffffff;
        --bg-secondary: #f4f4f8;
        --bg-overlay: rgba(255, 255, 255, 0.85);
        --text-primary: #15151c;
        --text-muted: #5c5c6b;
        --border: #d8d8e2;
        --accent: #5a3dff;
        --ai-bubble: #eeeef4;
        --ai-text: #15151c;
    }
}
"#;
