//! Copying code blocks out of rendered replies.

use tracing::warn;

/// Entity and line-break replacements, applied in order. `&amp;` comes after
/// `&lt;`/`&gt;` so `&amp;lt;` decodes to the literal text `&lt;`.
const DECODE_TABLE: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("<br>", "\n"),
];

/// Turn a code block's stored source back into plain text.
pub fn decode_code_block(original: &str) -> String {
    DECODE_TABLE
        .iter()
        .fold(original.to_string(), |text, (from, to)| text.replace(from, to))
        .trim()
        .to_string()
}

#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    /// The platform clipboard refused; the text is shown pre-selected so the
    /// user can copy it by hand.
    ManualSelection(String),
}

impl CopyOutcome {
    pub fn text(&self) -> &str {
        match self {
            CopyOutcome::Copied(text) | CopyOutcome::ManualSelection(text) => text,
        }
    }
}

pub fn copy_code(sink: &mut dyn ClipboardSink, original: &str) -> CopyOutcome {
    let text = decode_code_block(original);
    match sink.write_text(&text) {
        Ok(()) => CopyOutcome::Copied(text),
        Err(err) => {
            warn!("clipboard write failed, falling back to manual selection: {err}");
            CopyOutcome::ManualSelection(text)
        }
    }
}

/// The OS clipboard on desktop and mobile builds.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct SystemClipboard;

#[cfg(not(target_arch = "wasm32"))]
impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError(err.to_string()))
    }
}

/// Script for `navigator.clipboard.writeText`; resolves to `true` on success.
pub fn browser_copy_script(text: &str) -> String {
    let literal = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"try {{
    await navigator.clipboard.writeText({literal});
    return true;
}} catch (e) {{
    console.error('[Pahiy] clipboard write failed:', e);
    return false;
}}"#
    )
}
