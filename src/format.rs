//! Text shaping for the message pane and sidebar.

use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]");

/// SQLite `CURRENT_TIMESTAMP`.
const SQLITE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const NAIVE_ISO_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_ISO_FRACTION_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

pub const CHAR_WARNING_THRESHOLD: usize = 800;
pub const CHAR_ERROR_THRESHOLD: usize = 950;

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// RFC 3339 timestamp for messages created on this side.
pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Parse a backend timestamp. Values without an offset are wall-clock times
/// and are read as `local`.
pub fn parse_timestamp_in(raw: &str, local: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed.to_offset(local));
    }
    [SQLITE_FORMAT, NAIVE_ISO_FRACTION_FORMAT, NAIVE_ISO_FORMAT]
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .map(|naive| naive.assume_offset(local))
}

/// `HH:MM` under a message bubble. Missing or unreadable stamps show the
/// current time.
pub fn message_time(raw: Option<&str>) -> String {
    let local = local_offset();
    let datetime = raw
        .and_then(|raw| parse_timestamp_in(raw, local))
        .unwrap_or_else(|| OffsetDateTime::now_utc().to_offset(local));
    datetime.format(MESSAGE_TIME_FORMAT).unwrap_or_default()
}

fn short_month(month: Month) -> &'static str {
    match month {
        Month::January => "Oca",
        Month::February => "Şub",
        Month::March => "Mar",
        Month::April => "Nis",
        Month::May => "May",
        Month::June => "Haz",
        Month::July => "Tem",
        Month::August => "Ağu",
        Month::September => "Eyl",
        Month::October => "Eki",
        Month::November => "Kas",
        Month::December => "Ara",
    }
}

/// Sidebar date label. Days are whole 24h periods elapsed, not calendar days.
pub fn relative_date(date: OffsetDateTime, now: OffsetDateTime) -> String {
    match (now - date).whole_days() {
        days if days <= 0 => "Bugün".to_string(),
        1 => "Dün".to_string(),
        days if days < 7 => format!("{days} gün önce"),
        _ => format!("{} {}", date.day(), short_month(date.month())),
    }
}

pub fn chat_date_label(raw: Option<&str>) -> String {
    let local = local_offset();
    raw.and_then(|raw| parse_timestamp_in(raw, local))
        .map(|date| relative_date(date, OffsetDateTime::now_utc().to_offset(local)))
        .unwrap_or_default()
}

// ============================================
// HTML
// ============================================

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escaped text with newlines as `<br>`.
pub fn plain_text_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharCountLevel {
    Normal,
    Warning,
    Error,
}

impl CharCountLevel {
    pub fn for_count(count: usize) -> Self {
        if count > CHAR_ERROR_THRESHOLD {
            Self::Error
        } else if count > CHAR_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn color_var(self) -> &'static str {
        match self {
            Self::Normal => "var(--text-muted)",
            Self::Warning => "var(--warning)",
            Self::Error => "var(--error)",
        }
    }
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickAction {
    WriteCode,
    Explain,
    Translate,
}

impl QuickAction {
    pub const ALL: [QuickAction; 3] = [Self::WriteCode, Self::Explain, Self::Translate];

    pub fn key(self) -> &'static str {
        match self {
            Self::WriteCode => "kod_yaz",
            Self::Explain => "aciklama",
            Self::Translate => "cevir",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WriteCode => "Kod yaz",
            Self::Explain => "Açıkla",
            Self::Translate => "Çevir",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::WriteCode => "💻",
            Self::Explain => "📖",
            Self::Translate => "🌐",
        }
    }

    /// Text placed in the composer.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::WriteCode => "Bana bir JavaScript fonksiyonu yazabilir misin?",
            Self::Explain => "Bu konuyu detaylıca açıklar mısın?",
            Self::Translate => "Şu metni İngilizceye çevirebilir misin: ",
        }
    }
}

// ============================================
// Message segments
// ============================================

/// A run of rendered reply content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Html(String),
    Code {
        language: String,
        /// Escaped source as the backend rendered it for display.
        display: String,
        /// Attribute-encoded source used for copying.
        original: String,
    },
}

static CODE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<div class="code-block" data-original-code="(?P<original>[^"]*)">.*?<span class="language">(?P<language>[^<]*)</span>.*?<pre><code>(?P<display>.*?)</code></pre>(?:\s|<br>)*</div>"#,
    )
    .expect("valid code block pattern")
});

fn push_html(segments: &mut Vec<Segment>, html: &str) {
    let trimmed = html
        .trim()
        .trim_start_matches("<br>")
        .trim_end_matches("<br>")
        .trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Html(trimmed.to_string()));
    }
}

/// Split backend reply HTML so each code block can carry its own copy button.
pub fn segment_reply(html: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for captures in CODE_BLOCK_RE.captures_iter(html) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        push_html(&mut segments, &html[cursor..whole.start()]);
        let group = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        let language = group("language").trim().to_string();
        segments.push(Segment::Code {
            language: if language.is_empty() {
                "text".to_string()
            } else {
                language
            },
            display: group("display"),
            original: group("original"),
        });
        cursor = whole.end();
    }
    push_html(&mut segments, &html[cursor..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn parses_backend_timestamp_shapes() {
        let local = offset!(+3);
        let sqlite = parse_timestamp_in("2024-05-01 09:30:00", local).unwrap();
        assert_eq!((sqlite.hour(), sqlite.minute()), (9, 30));

        let naive = parse_timestamp_in("2024-05-01T09:30:12.123456", local).unwrap();
        assert_eq!((naive.hour(), naive.minute()), (9, 30));

        let zoned = parse_timestamp_in("2024-05-01T06:30:00Z", local).unwrap();
        assert_eq!((zoned.hour(), zoned.minute()), (9, 30));

        assert!(parse_timestamp_in("yesterday", local).is_none());
    }

    #[test]
    fn relative_dates_follow_elapsed_days() {
        let now = datetime!(2024-05-10 12:00 UTC);
        assert_eq!(relative_date(datetime!(2024-05-10 08:00 UTC), now), "Bugün");
        assert_eq!(relative_date(datetime!(2024-05-09 11:00 UTC), now), "Dün");
        assert_eq!(relative_date(datetime!(2024-05-06 12:00 UTC), now), "4 gün önce");
        assert_eq!(relative_date(datetime!(2024-01-05 12:00 UTC), now), "5 Oca");
    }

    #[test]
    fn char_counter_levels() {
        assert_eq!(CharCountLevel::for_count(800), CharCountLevel::Normal);
        assert_eq!(CharCountLevel::for_count(801), CharCountLevel::Warning);
        assert_eq!(CharCountLevel::for_count(951), CharCountLevel::Error);
        assert_eq!(char_count("çğş"), 3);
    }

    #[test]
    fn user_text_is_escaped() {
        assert_eq!(
            plain_text_html("<b>hi</b> & \"bye\"\nok"),
            "&lt;b&gt;hi&lt;/b&gt; &amp; &quot;bye&quot;<br>ok"
        );
    }

    #[test]
    fn quick_actions_resolve_by_key() {
        assert_eq!(QuickAction::from_key("cevir"), Some(QuickAction::Translate));
        assert_eq!(QuickAction::from_key("nope"), None);
        assert!(QuickAction::Translate.prompt().ends_with(": "));
    }

    #[test]
    fn replies_split_around_code_blocks() {
        let html = concat!(
            "Örnek:<br>",
            r#"<br>        <div class="code-block" data-original-code="print(&quot;hi&quot;)">"#,
            r#"<br>            <div class="code-header"><br>                <span class="language">python</span>"#,
            r#"<br>                <button class="copy-btn" onclick="copyCode(this)"><br>                    <i class="fas fa-copy"></i> Kopyala<br>                </button><br>            </div>"#,
            r#"<br>            <pre><code>print(&quot;hi&quot;)</code></pre><br>        </div>"#,
            "<br><strong>Bitti</strong>"
        );
        let segments = segment_reply(html);
        assert_eq!(
            segments,
            vec![
                Segment::Html("Örnek:".into()),
                Segment::Code {
                    language: "python".into(),
                    display: "print(&quot;hi&quot;)".into(),
                    original: "print(&quot;hi&quot;)".into(),
                },
                Segment::Html("<strong>Bitti</strong>".into()),
            ]
        );
    }

    #[test]
    fn plain_replies_are_a_single_segment() {
        assert_eq!(
            segment_reply("Merhaba!"),
            vec![Segment::Html("Merhaba!".into())]
        );
        assert!(segment_reply("   ").is_empty());
    }
}
