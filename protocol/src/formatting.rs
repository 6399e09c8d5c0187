//! Message text formatting: span classification and the canonical parser.
//!
//! Formatting is word-scoped. A whitespace-delimited word wrapped in a
//! matching marker pair (`*bold*`, `_italic_`, `~struck~`, `` `snippet` ``,
//! `#secret#`) becomes a formatted span with the markers stripped; unmarked
//! words are auto-classified as URIs, email addresses, or phone numbers
//! where they match. Everything else merges into unformatted runs, so a
//! parse of plain text yields a single span.

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Formatting applied to a span of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Format {
    Bold,
    Italic,
    StrikeThrough,
    Snippet,
    Secret,
    Uri,
    Email,
    Phone,
}

/// A run of message text with at most one format applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSpan {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl FormattedSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
        }
    }

    pub fn formatted(text: impl Into<String>, format: Format) -> Self {
        Self {
            text: text.into(),
            format: Some(format),
        }
    }
}

const MARKERS: [(char, Format); 5] = [
    ('*', Format::Bold),
    ('_', Format::Italic),
    ('~', Format::StrikeThrough),
    ('`', Format::Snippet),
    ('#', Format::Secret),
];

/// Split `text` into formatted spans.
pub fn parse_spans(text: &str) -> Vec<FormattedSpan> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    for token in tokenize(text) {
        match classify(token) {
            Some((shown, format)) => {
                flush_plain(&mut plain, &mut spans);
                spans.push(FormattedSpan::formatted(shown, format));
            }
            None => plain.push_str(token),
        }
    }
    flush_plain(&mut plain, &mut spans);
    spans
}

fn flush_plain(plain: &mut String, spans: &mut Vec<FormattedSpan>) {
    if !plain.is_empty() {
        spans.push(FormattedSpan::plain(std::mem::take(plain)));
    }
}

/// Words and the whitespace runs between them, in order.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            None => in_space = Some(is_space),
            Some(prev) if prev != is_space => {
                tokens.push(&text[start..idx]);
                start = idx;
                in_space = Some(is_space);
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn classify(token: &str) -> Option<(String, Format)> {
    if token.chars().next().is_none_or(char::is_whitespace) {
        return None;
    }
    if let Some(format) = marker_format(token) {
        // Markers are single ASCII characters, so stripping one byte off
        // each end stays on character boundaries.
        return Some((token[1..token.len() - 1].to_string(), format));
    }
    if is_uri(token) {
        return Some((token.to_string(), Format::Uri));
    }
    if is_email(token) {
        return Some((token.to_string(), Format::Email));
    }
    if is_phone(token) {
        return Some((token.to_string(), Format::Phone));
    }
    None
}

fn marker_format(word: &str) -> Option<Format> {
    let mut chars = word.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if first != last || word.len() < 3 {
        return None;
    }
    MARKERS
        .iter()
        .find(|(marker, _)| *marker == first)
        .map(|(_, format)| *format)
}

fn is_uri(word: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        word.len() > scheme.len() && word[..scheme.len()].eq_ignore_ascii_case(scheme)
    })
}

fn is_email(word: &str) -> bool {
    let Some((local, domain)) = word.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_phone(word: &str) -> bool {
    let Some(rest) = word.strip_prefix('+') else {
        return false;
    };
    (7..=15).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_digit())
}
