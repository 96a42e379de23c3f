/// A markdown ATX heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading text without the `#` markers
    pub text: String,
    /// Number of `#`
    pub level: usize,
    /// 0-indexed line
    pub line: usize,
}

/// A list item and the lines it spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// 0-indexed line of the marker
    pub line: usize,
    /// Last line belonging to the item (continuation lines included)
    pub end_line: usize,
    /// Leading spaces before the marker
    pub indent: usize,
    /// Index into `Outline::headings` of the closest heading above
    pub heading: Option<usize>,
}

/// Structural metadata of a note: headings and list items, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub list_items: Vec<ListItem>,
}

impl Outline {
    /// First heading whose text matches `text` (surrounding whitespace ignored)
    pub fn heading_by_text(&self, text: &str) -> Option<&Heading> {
        self.heading_index(text).map(|idx| &self.headings[idx])
    }

    fn heading_index(&self, text: &str) -> Option<usize> {
        let wanted = text.trim();
        self.headings.iter().position(|h| h.text == wanted)
    }

    /// List items in the section opened by the heading `text`, up to the next
    /// heading of the same or a higher level. Subsections count as part of it.
    pub fn list_items_under_heading(&self, text: &str) -> Vec<&ListItem> {
        let Some(idx) = self.heading_index(text) else {
            return Vec::new();
        };
        let heading = &self.headings[idx];
        let section_end = self.headings[idx + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map_or(usize::MAX, |h| h.line);

        self.list_items
            .iter()
            .filter(|item| item.line > heading.line && item.line < section_end)
            .collect()
    }
}

/// Scan a note for headings and list items. Fenced code blocks are skipped.
pub fn parse_outline(source: &str) -> Outline {
    let mut outline = Outline::default();
    let mut in_fence = false;

    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some((level, text)) = heading(line) {
            outline.headings.push(Heading {
                text: text.to_string(),
                level,
                line: idx,
            });
            continue;
        }

        if let Some(indent) = list_marker_indent(line) {
            outline.list_items.push(ListItem {
                line: idx,
                end_line: idx,
                indent,
                heading: outline.headings.len().checked_sub(1),
            });
            continue;
        }

        // Indented text right after a list item continues it
        if let Some(last) = outline.list_items.last_mut()
            && last.end_line + 1 == idx
            && !line.trim().is_empty()
            && count_indent(line) > last.indent
        {
            last.end_line = idx;
        }
    }

    outline
}

/// `## Text` → (2, "Text")
fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some((hashes, rest.trim()))
}

/// Indent of a `-`, `*`, `+` or `1.` list line
fn list_marker_indent(line: &str) -> Option<usize> {
    let indent = count_indent(line);
    let content = &line[indent..];

    let after_marker = if let Some(rest) = content.strip_prefix(['-', '*', '+']) {
        rest
    } else {
        let digits = content.len() - content.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        content[digits..].strip_prefix(['.', ')'])?
    };

    if after_marker.is_empty() || after_marker.starts_with(' ') {
        Some(indent)
    } else {
        None
    }
}

fn count_indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "\
# 2026-10-17

Some intro text.

# Day planner

- [ ] 09:00 - 10:00 Deep work
  - subtask
- [ ] 10:00 - 10:30 Email
  continued on the next line

## Notes

- not a plan item

# Journal

```
# not a heading
- not a list item
```
";

    #[test]
    fn test_headings() {
        let outline = parse_outline(NOTE);
        let texts: Vec<(&str, usize, usize)> = outline
            .headings
            .iter()
            .map(|h| (h.text.as_str(), h.level, h.line))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("2026-10-17", 1, 0),
                ("Day planner", 1, 4),
                ("Notes", 2, 11),
                ("Journal", 1, 15),
            ]
        );
    }

    #[test]
    fn test_list_items_under_heading_include_subsections() {
        let outline = parse_outline(NOTE);
        let lines: Vec<usize> = outline
            .list_items_under_heading("Day planner")
            .iter()
            .map(|item| item.line)
            .collect();
        assert_eq!(lines, vec![6, 7, 8, 13]);
        assert!(outline.list_items_under_heading("Journal").is_empty());
        assert!(outline.list_items_under_heading("Missing").is_empty());
    }

    #[test]
    fn test_continuation_lines_extend_item() {
        let outline = parse_outline(NOTE);
        let email = outline.list_items.iter().find(|i| i.line == 8).unwrap();
        assert_eq!(email.end_line, 9);
        assert_eq!(email.heading, Some(1));
        let sub = outline.list_items.iter().find(|i| i.line == 7).unwrap();
        assert_eq!(sub.indent, 2);
    }

    #[test]
    fn test_marker_variants() {
        assert_eq!(list_marker_indent("1. first"), Some(0));
        assert_eq!(list_marker_indent("   * star"), Some(3));
        assert_eq!(list_marker_indent("-dash"), None);
        assert_eq!(list_marker_indent("#tag"), None);
        assert_eq!(heading("#tag"), None);
        assert_eq!(heading("### Deep"), Some((3, "Deep")));
    }
}
