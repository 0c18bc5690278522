use regex::Regex;
use std::sync::OnceLock;

/// `[Name]: text` or `[Name] (annotation): text`.
///
/// The name capture is non-greedy, so a `]` inside a name ends it early
/// whenever the rest of the line still fits the pattern.
fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX.get_or_init(|| {
        Regex::new(r"^\[(.*?)\](?:\s*\((.*?)\))?:\s*(.*)").expect("header regex is valid")
    })
}

/// The parts of a line that opens a new turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    pub sender: &'a str,
    /// Free-text note such as a delivery mode. Carries no role information.
    pub annotation: Option<&'a str>,
    pub payload: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Header(HeaderLine<'a>),
    Continuation(&'a str),
}

/// Classify one transcript line. Matching is done on the untrimmed line, so
/// an indented `[Name]:` is a continuation.
pub fn classify_line(line: &str) -> LineKind<'_> {
    match header_regex().captures(line) {
        Some(caps) => LineKind::Header(HeaderLine {
            sender: caps.get(1).map_or("", |m| m.as_str()),
            annotation: caps.get(2).map(|m| m.as_str()),
            payload: caps.get(3).map_or("", |m| m.as_str()).trim(),
        }),
        None => LineKind::Continuation(line),
    }
}

/// Remove one pair of enclosing straight double quotes.
///
/// A lone `"` both starts and ends with a quote and strips to "".
pub fn strip_quotes(text: &str) -> &str {
    if text.starts_with('"') && text.ends_with('"') {
        if text.len() == 1 {
            ""
        } else {
            &text[1..text.len() - 1]
        }
    } else {
        text
    }
}
