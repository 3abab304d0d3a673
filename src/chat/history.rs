//! Search and export over the session conversation.

use crate::format::escape_html;
use crate::types::ChatMessage;
use regex::RegexBuilder;
use serde::Serialize;

pub const MSG_NO_RESULTS: &str = "❌ Sonuç bulunamadı";
pub const MSG_EXPORTED: &str = "📤 Konuşma dışa aktarıldı";
pub const MSG_ITEM_DELETED: &str = "🗑️ Mesaj silindi";

pub fn results_notice(count: usize) -> String {
    format!("🔍 {count} sonuç bulundu")
}

/// Case-insensitive substring match. Indices point into `messages`.
pub fn search<'a>(messages: &'a [ChatMessage], query: &str) -> Vec<(usize, &'a ChatMessage)> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    messages
        .iter()
        .enumerate()
        .filter(|(_, message)| message.content.to_lowercase().contains(&needle))
        .collect()
}

/// Escape `text` for HTML and wrap every occurrence of `query` in `<mark>`.
/// Matches are found on the raw text, so the query never lands inside an
/// entity. The query is matched literally, never as a pattern.
pub fn highlight(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return escape_html(text);
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return escape_html(text);
    };
    let mut html = String::with_capacity(text.len());
    let mut last = 0;
    for hit in pattern.find_iter(text) {
        html.push_str(&escape_html(&text[last..hit.start()]));
        html.push_str("<mark class=\"search-hit\">");
        html.push_str(&escape_html(hit.as_str()));
        html.push_str("</mark>");
        last = hit.end();
    }
    html.push_str(&escape_html(&text[last..]));
    html
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationExport<'a> {
    pub session_id: &'a str,
    pub export_date: String,
    pub conversation: &'a [ChatMessage],
}

impl<'a> ConversationExport<'a> {
    pub fn new(session_id: &'a str, conversation: &'a [ChatMessage]) -> Self {
        Self {
            session_id,
            export_date: crate::format::now_timestamp(),
            conversation,
        }
    }

    pub fn file_name(&self) -> String {
        export_file_name(self.session_id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn export_file_name(session_id: &str) -> String {
    format!("pahiy-chat-{session_id}.json")
}

/// Script that hands `json` to the browser as a file download.
pub fn browser_download_script(file_name: &str, json: &str) -> String {
    let name = serde_json::to_string(file_name).unwrap_or_else(|_| "\"export.json\"".to_string());
    let body = serde_json::to_string(json).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"const blob = new Blob([{body}], {{ type: 'application/json' }});
const url = URL.createObjectURL(blob);
const link = document.createElement('a');
link.href = url;
link.download = {name};
document.body.appendChild(link);
link.click();
document.body.removeChild(link);
URL.revokeObjectURL(url);"#
    )
}

/// Write the export into the user's downloads (or `fallback_dir`).
#[cfg(not(target_arch = "wasm32"))]
pub fn write_export(
    file_name: &str,
    json: &str,
    fallback_dir: &std::path::Path,
) -> anyhow::Result<std::path::PathBuf> {
    use anyhow::Context;

    let dir = dirs::download_dir().unwrap_or_else(|| fallback_dir.to_path_buf());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "conversation exported");
    Ok(path)
}
