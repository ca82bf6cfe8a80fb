use std::fmt;
use std::ops::Deref;

use once_cell::sync::Lazy;
use regex::Regex;

/// How raw document text is reshaped before the extractors see it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Keep the document's line breaks; collapse whitespace inside lines.
    #[default]
    PreserveLines,
    /// Collapse everything onto one line, then break at sentence boundaries.
    Flatten,
}

/// Text produced by the normalizer. Read-only once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expand Unicode typographic ligatures left behind by PDF text extraction.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());

/// Collapse all whitespace (newlines included) to single spaces, then put a
/// newline after every sentence-ending period.
///
/// `"John  Smith.\nEngineer"` → `"John Smith.\nEngineer"`
pub fn normalize(raw: &str) -> NormalizedText {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let text = expand_ligatures(raw);
    let text = WS_RE.replace_all(&text, " ");
    let text = SENTENCE_BREAK_RE.replace_all(&text, ".\n");
    NormalizedText(text.trim().to_string())
}

/// Line-preserving variant of [`normalize`].
///
/// Line endings are unified to `\n`, whitespace runs inside a line collapse to
/// one space, each line is trimmed and runs of blank lines shrink to one.
/// Sentence boundaries still gain a newline.
pub fn normalize_preserving_lines(raw: &str) -> NormalizedText {
    static INLINE_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
    static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

    let text = expand_ligatures(raw)
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}', '\u{2028}', '\u{2029}'], "\n");

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| INLINE_WS_RE.replace_all(line, " ").trim().to_string())
        .collect();
    let text = lines.join("\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    // Only same-line breaks: the period may already end its line.
    let text = text.replace(". ", ".\n");
    NormalizedText(text.trim().to_string())
}

pub fn normalize_with_mode(raw: &str, mode: NormalizeMode) -> NormalizedText {
    match mode {
        NormalizeMode::PreserveLines => normalize_preserving_lines(raw),
        NormalizeMode::Flatten => normalize(raw),
    }
}

/// Byte offset `n` characters after `start`, clamped to the end of `text`.
pub(crate) fn advance_chars(text: &str, start: usize, n: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len())
}

/// Byte offset `n` characters before `end`, clamped to the start of `text`.
pub(crate) fn retreat_chars(text: &str, end: usize, n: usize) -> usize {
    if n == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}
