use crate::io::lock::LockError;
use crate::parse::outline::{Outline, parse_outline};

/// Error type for document host operations
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("document not found: {path}")]
    NotFound { path: String },
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line} is out of range in {path}")]
    LineOutOfRange { path: String, line: usize },
    #[error("text not found in {path}: {text:?}")]
    TextNotFound { path: String, text: String },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// A note's content together with its structural metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub outline: Outline,
}

impl Document {
    pub fn new(text: String) -> Self {
        let outline = parse_outline(&text);
        Document { text, outline }
    }

    /// 0-indexed line, without its newline
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.text.split('\n').nth(idx)
    }

    /// Index of the last line (a trailing newline opens an empty last line)
    pub fn last_line(&self) -> usize {
        self.text.split('\n').count() - 1
    }
}

/// Line/character position; `ch` counts chars, not bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextPosition {
    pub line: usize,
    pub ch: usize,
}

impl TextPosition {
    pub fn new(line: usize, ch: usize) -> Self {
        TextPosition { line, ch }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    /// Empty range: replacing it inserts at `pos`
    pub fn at(pos: TextPosition) -> Self {
        TextRange { start: pos, end: pos }
    }
}

/// What the editor has selected after a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: String,
    pub range: TextRange,
}

/// The capabilities the reconciler needs from whatever stores the notes.
pub trait DocumentHost {
    /// Read a note and its structural metadata
    fn read_document(&self, path: &str) -> Result<Document, HostError>;

    /// Replace the whole content of a note with `edit(current)`.
    /// Atomic from the caller's point of view.
    fn mutate_document<F>(&mut self, path: &str, edit: F) -> Result<(), HostError>
    where
        F: FnOnce(&str) -> String;

    fn get_line(&self, path: &str, line: usize) -> Result<String, HostError>;

    fn replace_range(&mut self, path: &str, range: TextRange, text: &str)
    -> Result<(), HostError>;

    /// Select the first occurrence of `text` in the note
    fn select_text(&mut self, path: &str, text: &str) -> Result<TextRange, HostError>;

    /// Select `range`, which must lie inside the note
    fn select_range(&mut self, path: &str, range: TextRange) -> Result<(), HostError>;
}

// ---------------------------------------------------------------------------
// Text helpers shared by host implementations
// ---------------------------------------------------------------------------

/// Fetch one line of `text` or fail with `LineOutOfRange`
pub fn line_of(text: &str, path: &str, line: usize) -> Result<String, HostError> {
    text.split('\n')
        .nth(line)
        .map(str::to_string)
        .ok_or_else(|| HostError::LineOutOfRange {
            path: path.to_string(),
            line,
        })
}

/// Byte offset of a position, or `None` if it lies outside `text`
fn byte_offset(text: &str, pos: TextPosition) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..pos.line {
        line_start += text[line_start..].find('\n')? + 1;
    }
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = &text[line_start..line_end];

    if pos.ch == line.chars().count() {
        return Some(line_end);
    }
    line.char_indices()
        .nth(pos.ch)
        .map(|(offset, _)| line_start + offset)
}

/// Byte span of `range` in `text`, or `LineOutOfRange` if it does not fit
pub fn byte_span(text: &str, path: &str, range: TextRange) -> Result<(usize, usize), HostError> {
    let out_of_range = |line| HostError::LineOutOfRange {
        path: path.to_string(),
        line,
    };
    let start = byte_offset(text, range.start).ok_or_else(|| out_of_range(range.start.line))?;
    let end = byte_offset(text, range.end).ok_or_else(|| out_of_range(range.end.line))?;
    if end < start {
        return Err(out_of_range(range.end.line));
    }
    Ok((start, end))
}

/// `text` with `range` replaced by `replacement`
pub fn splice(text: &str, path: &str, range: TextRange, replacement: &str) -> Result<String, HostError> {
    let (start, end) = byte_span(text, path, range)?;

    let mut result = String::with_capacity(text.len() + replacement.len());
    result.push_str(&text[..start]);
    result.push_str(replacement);
    result.push_str(&text[end..]);
    Ok(result)
}

/// Range of the first occurrence of `needle`
pub fn find_text(text: &str, needle: &str) -> Option<TextRange> {
    if needle.is_empty() {
        return None;
    }
    let start = text.find(needle)?;
    Some(TextRange {
        start: position_of(text, start),
        end: position_of(text, start + needle.len()),
    })
}

fn position_of(text: &str, byte: usize) -> TextPosition {
    let before = &text[..byte];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    TextPosition::new(line, before[line_start..].chars().count())
}
