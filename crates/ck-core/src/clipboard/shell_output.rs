//! Tolerant parsing of clipboard-dump command output.
//!
//! Clipboard dump commands print the same fact in many shapes depending on
//! the platform build and the command used:
//!
//! ```text
//! text='hello'                      quoted key/value
//! text="hello"
//! Text: 'hello'                     labelled line
//! ClipData { text=hello }           structured object with a text field
//! ClipData { text/plain {T:hello} } item fragments
//! hello                             plain output
//! No primary clip                   explicit "nothing there"
//! ```
//!
//! Items are only extracted from a `ClipData` / `ClipDescription` dump, or
//! when the whole output is a sequence of quoted `text=` / `Text:` labels.
//! Anything else is the clipboard text itself, so copied prose or code that
//! happens to contain `text=` is never cut into a fragment.
//!
//! Commands that print the clipboard verbatim (`xclip -o`, `wl-paste`) use
//! [`DumpFormat::Raw`], which skips every rule above.
//!
//! All rules live here so call sites never re-implement any of them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How the dump command prints the clipboard.
///
/// 剪贴板导出命令的输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpFormat {
    /// Verbatim clipboard text; only blank output means empty.
    Raw,
    /// Labelled or structured output, with the known "empty" phrases.
    Auto,
}

/// 剪贴板导出命令的解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellClipOutput {
    /// Text content, items joined with `\n`.
    Text(String),
    /// The command reported an empty clipboard.
    Empty,
    /// Structured output without a recognisable text field.
    Unrecognized,
}

impl ShellClipOutput {
    pub fn into_text(self) -> Option<String> {
        match self {
            ShellClipOutput::Text(text) => Some(text),
            ShellClipOutput::Empty | ShellClipOutput::Unrecognized => None,
        }
    }
}

const EMPTY_PHRASES: &[&str] = &[
    "no primary clip",
    "no clip",
    "no clip data",
    "clipboard is empty",
    "primary clip is empty",
    "null",
];

static STRUCTURED_WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ClipData|ClipDescription").expect("static regex is valid"));

// `text=` anywhere inside a structured dump, as long as `text` is not the tail of a longer identifier.
static TEXT_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^A-Za-z0-9_])text\s*=\s*").expect("static regex is valid")
});

// `Text:` label, only at the start of a line.
static TEXT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*text[ \t]*:[ \t]*").expect("static regex is valid"));

static ITEM_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{T:").expect("static regex is valid"));

// Key of a whole-output labelled item; the value must be quoted.
static LABELLED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)text[ \t]*[=:][ \t]*").expect("static regex is valid"));

#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Assign,
    Label,
    Fragment,
}

impl ValueKind {
    fn is_unquoted_terminator(self, c: char) -> bool {
        match self {
            ValueKind::Assign => matches!(c, '}' | ')' | ',' | '\n' | '\r'),
            ValueKind::Label => matches!(c, '\n' | '\r'),
            ValueKind::Fragment => matches!(c, '}' | '\n' | '\r'),
        }
    }
}

/// Parse the stdout of a clipboard dump command in the given format.
pub fn parse_dump(raw: &str, format: DumpFormat) -> ShellClipOutput {
    match format {
        DumpFormat::Raw => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                ShellClipOutput::Empty
            } else {
                ShellClipOutput::Text(trimmed.to_string())
            }
        }
        DumpFormat::Auto => parse_shell_output(raw),
    }
}

/// Parse labelled or structured dump output ([`DumpFormat::Auto`]).
pub fn parse_shell_output(raw: &str) -> ShellClipOutput {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_empty_phrase(trimmed) {
        return ShellClipOutput::Empty;
    }

    if STRUCTURED_WRAPPER.is_match(trimmed) {
        let items = extract_items(trimmed);
        if items.is_empty() {
            return ShellClipOutput::Unrecognized;
        }
        return join_items(&items);
    }

    match labelled_items(trimmed) {
        Some(items) => join_items(&items),
        None => ShellClipOutput::Text(trimmed.to_string()),
    }
}

fn join_items(items: &[String]) -> ShellClipOutput {
    let joined = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() {
        ShellClipOutput::Empty
    } else {
        ShellClipOutput::Text(joined)
    }
}

fn is_empty_phrase(trimmed: &str) -> bool {
    let lowered = trimmed.to_lowercase();
    let normalized = lowered.trim_end_matches(|c: char| c == '.' || c == '!').trim();
    EMPTY_PHRASES.contains(&normalized)
}

/// Items of an output made only of `text='..'` / `Text: ".."` entries
/// separated by whitespace. `None` as soon as anything else shows up.
fn labelled_items(s: &str) -> Option<Vec<String>> {
    let mut items = Vec::new();
    let mut pos = 0;
    loop {
        let rest = s[pos..].trim_start();
        if rest.is_empty() {
            break;
        }
        pos = s.len() - rest.len();
        let key = LABELLED_KEY.find(rest)?;
        let value_start = pos + key.end();
        let quote = s[value_start..]
            .chars()
            .next()
            .filter(|c| matches!(c, '\'' | '"'))?;
        let body_start = value_start + quote.len_utf8();
        let close = find_closing_quote(s, body_start, quote)?;
        items.push(s[body_start..close].to_string());
        pos = close + quote.len_utf8();
    }
    (!items.is_empty()).then_some(items)
}

fn extract_items(s: &str) -> Vec<String> {
    let mut starts: Vec<(usize, ValueKind)> = Vec::new();
    starts.extend(TEXT_ASSIGN.find_iter(s).map(|m| (m.end(), ValueKind::Assign)));
    starts.extend(TEXT_LABEL.find_iter(s).map(|m| (m.end(), ValueKind::Label)));
    starts.extend(ITEM_FRAGMENT.find_iter(s).map(|m| (m.end(), ValueKind::Fragment)));
    starts.sort_by_key(|(pos, _)| *pos);

    let mut items = Vec::new();
    let mut consumed_to = 0;
    for (value_start, kind) in starts {
        // A key inside an already-read value is content, not structure.
        if value_start < consumed_to {
            continue;
        }
        let (value, end) = read_value(s, value_start, kind);
        items.push(value);
        consumed_to = end;
    }
    items
}

/// Read one value starting at `start`. Returns the value and the byte offset
/// just past it.
fn read_value(s: &str, start: usize, kind: ValueKind) -> (String, usize) {
    let rest = &s[start..];
    match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => read_quoted(s, start + quote.len_utf8(), quote),
        _ => {
            let len = rest
                .find(|c: char| kind.is_unquoted_terminator(c))
                .unwrap_or(rest.len());
            (rest[..len].to_string(), start + len)
        }
    }
}

/// A quote only closes the value when what follows it looks like the end of
/// a field, so apostrophes inside the text survive.
fn find_closing_quote(s: &str, body_start: usize, quote: char) -> Option<usize> {
    let mut search_from = body_start;
    while let Some(rel) = s[search_from..].find(quote) {
        let close = search_from + rel;
        let after = s[close + quote.len_utf8()..].trim_start_matches(|c: char| c == ' ' || c == '\t');
        let closes_field = after.is_empty()
            || after.starts_with(|c: char| matches!(c, '\n' | '\r' | ',' | '}' | ')' | ']'));
        if closes_field {
            return Some(close);
        }
        search_from = close + quote.len_utf8();
    }
    None
}

fn read_quoted(s: &str, body_start: usize, quote: char) -> (String, usize) {
    if let Some(close) = find_closing_quote(s, body_start, quote) {
        return (s[body_start..close].to_string(), close + quote.len_utf8());
    }

    // Unterminated quote: the value runs to the end of the line.
    let end = s[body_start..]
        .find('\n')
        .map(|i| body_start + i)
        .unwrap_or(s.len());
    (s[body_start..end].to_string(), end)
}
