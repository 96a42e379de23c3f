use std::sync::LazyLock;

use regex::Regex;

use crate::util::time::{format_minutes, parse_minutes};

/// `- [ ] 09:00 - 10:30 Text`: list marker, optional checkbox, start, optional end, rest
static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<prefix>\s*[-*+]\s+(?:\[.\]\s+)?)(?P<start>\d{1,2}:\d{2})(?:\s*-\s*(?P<end>\d{1,2}:\d{2}))?(?P<rest>.*)$",
    )
    .expect("timestamp pattern is valid")
});

/// A list line that starts with a time range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampLine<'a> {
    /// Indent, list marker and checkbox, verbatim
    pub prefix: &'a str,
    pub start_minutes: i32,
    pub end_minutes: Option<i32>,
    /// Everything after the time range, verbatim (usually starts with a space)
    pub rest: &'a str,
}

impl TimestampLine<'_> {
    /// The task text with surrounding whitespace removed
    pub fn text(&self) -> &str {
        self.rest.trim()
    }
}

/// Parse a list line carrying a timestamp. Returns `None` for any other line.
pub fn parse_timestamp_line(line: &str) -> Option<TimestampLine<'_>> {
    let caps = TIMESTAMP_LINE.captures(line)?;
    let start_minutes = parse_minutes(caps.name("start")?.as_str())?;
    let end_minutes = match caps.name("end") {
        Some(end) => Some(parse_minutes(end.as_str())?),
        None => None,
    };
    Some(TimestampLine {
        prefix: caps.name("prefix")?.as_str(),
        start_minutes,
        end_minutes,
        rest: caps.name("rest").map_or("", |m| m.as_str()),
    })
}

/// `09:00 - 10:30`
pub fn format_timestamp(start_minutes: i32, end_minutes: i32) -> String {
    format!(
        "{} - {}",
        format_minutes(start_minutes),
        format_minutes(end_minutes)
    )
}

/// Rewrite the time range of `line`, keeping marker, checkbox and text as they are.
/// Returns `None` when the line has no timestamp to replace.
pub fn replace_timestamp(line: &str, start_minutes: i32, end_minutes: i32) -> Option<String> {
    let parsed = parse_timestamp_line(line)?;
    Some(format!(
        "{}{}{}",
        parsed.prefix,
        format_timestamp(start_minutes, end_minutes),
        parsed.rest
    ))
}

/// Canonical line for an item that has never been written
pub fn format_list_line(start_minutes: i32, end_minutes: i32, text: &str) -> String {
    format!(
        "- [ ] {} {}",
        format_timestamp(start_minutes, end_minutes),
        text
    )
}
