use indexmap::IndexMap;
use tracing::{info, warn};

use crate::io::host::{Document, DocumentHost, HostError, TextPosition, TextRange};
use crate::model::config::PlannerConfig;
use crate::model::plan_item::PlanItem;
use crate::ops::overlap::add_placing;
use crate::parse::plan_parser::parse_plan_items;
use crate::parse::timestamp::{format_list_line, replace_timestamp};

/// Error type for reconciling plan items with their notes
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("not a daily note: {path}")]
    NotDailyNote { path: String },
    #[error("plan item not found at {path}:{line}")]
    ItemNotFound { path: String, line: usize },
    #[error(transparent)]
    Host(#[from] HostError),
}

/// What a successful sync did to one note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileChanges {
    /// Existing lines whose timestamp was rewritten
    pub updated: usize,
    /// New lines written under the planner heading
    pub inserted: usize,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: String,
    pub result: Result<FileChanges, SyncError>,
}

/// Per-note results of one sync. Notes succeed or fail independently.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub files: Vec<FileOutcome>,
}

impl SyncReport {
    /// True when nothing needed writing
    pub fn is_noop(&self) -> bool {
        self.files.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.result.is_err())
    }

    /// Successful notes, or the first failure
    pub fn into_result(self) -> Result<Vec<(String, FileChanges)>, SyncError> {
        self.files
            .into_iter()
            .map(|outcome| outcome.result.map(|changes| (outcome.path, changes)))
            .collect()
    }
}

/// Writes edited plan items back into their notes.
pub struct PlanEditor<H: DocumentHost> {
    config: PlannerConfig,
    host: H,
}

impl<H: DocumentHost> PlanEditor<H> {
    pub fn new(config: PlannerConfig, host: H) -> Self {
        PlanEditor {
            config: config.normalized(),
            host,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// `# Day planner`, with as many `#` as configured
    pub fn create_planner_heading(&self) -> String {
        format!(
            "{} {}",
            "#".repeat(self.config.planner_heading_level),
            self.config.planner_heading
        )
    }

    /// Parse the plan of a daily note, placings included
    pub fn load_plan_items(&self, path: &str) -> Result<Vec<PlanItem>, SyncError> {
        self.ensure_daily_note(path)?;
        let doc = self.host.read_document(path)?;
        let items = parse_plan_items(
            &doc.text,
            &doc.outline,
            &self.config.planner_heading,
            path,
            self.config.default_duration_minutes,
        );
        Ok(add_placing(items))
    }

    /// Persist the difference between `baseline` and `updated`.
    ///
    /// Items equal to some baseline item are left alone. Changed items that
    /// already have a line get their timestamp rewritten in place; items
    /// without a line are appended to the plan under the planner heading.
    pub fn sync_with_file(&mut self, baseline: &[PlanItem], updated: &[PlanItem]) -> SyncReport {
        let mut dirty_by_file: IndexMap<&str, Vec<&PlanItem>> = IndexMap::new();
        for item in updated.iter().filter(|item| !baseline.contains(item)) {
            dirty_by_file
                .entry(item.location.path.as_str())
                .or_default()
                .push(item);
        }

        let mut report = SyncReport::default();
        for (path, items) in dirty_by_file {
            let result = self.sync_file(path, &items);
            match &result {
                Ok(changes) => info!(
                    path,
                    updated = changes.updated,
                    inserted = changes.inserted,
                    "note synced"
                ),
                Err(e) => warn!(path, error = %e, "note sync failed"),
            }
            report.files.push(FileOutcome {
                path: path.to_string(),
                result,
            });
        }
        report
    }

    fn ensure_daily_note(&self, path: &str) -> Result<(), SyncError> {
        match self.config.daily_note_date(path) {
            Some(_) => Ok(()),
            None => Err(SyncError::NotDailyNote {
                path: path.to_string(),
            }),
        }
    }

    fn sync_file(&mut self, path: &str, items: &[&PlanItem]) -> Result<FileChanges, SyncError> {
        self.ensure_daily_note(path)?;
        // One snapshot per note: every line number below refers to it
        let doc = self.host.read_document(path)?;

        let (in_file, mut new_items): (Vec<&PlanItem>, Vec<&PlanItem>) =
            items.iter().copied().partition(|item| item.is_in_file());

        // Check every referenced line before touching the note
        let mut retimed = Vec::with_capacity(in_file.len());
        for item in &in_file {
            let line = item.location.line.unwrap_or_default();
            let holds_timestamp = doc
                .line(line)
                .and_then(|text| replace_timestamp(text, item.start_minutes, item.end_minutes))
                .is_some();
            if !holds_timestamp {
                return Err(SyncError::ItemNotFound {
                    path: path.to_string(),
                    line,
                });
            }
            retimed.push((line, item.start_minutes, item.end_minutes));
        }

        if !retimed.is_empty() {
            self.host
                .mutate_document(path, |text| retime_lines(text, &retimed))?;
        }

        new_items.sort_by_key(|item| item.start_minutes);
        if !new_items.is_empty() {
            self.append_to_plan(path, &doc, &new_items)?;
        }

        Ok(FileChanges {
            updated: retimed.len(),
            inserted: new_items.len(),
        })
    }

    /// Insert items after the last list item of the planner section, creating
    /// the heading at the end of the note if it does not exist yet.
    fn append_to_plan(
        &mut self,
        path: &str,
        doc: &Document,
        items: &[&PlanItem],
    ) -> Result<(), SyncError> {
        let heading = &self.config.planner_heading;
        let section_items = doc.outline.list_items_under_heading(heading);

        let (mut anchor, mut needs_heading, mut after_heading) =
            match (doc.outline.heading_by_text(heading), section_items.last()) {
                (_, Some(last)) => (last.end_line, false, false),
                (Some(h), None) => (h.line, false, true),
                (None, None) => (doc.last_line(), true, false),
            };

        for item in items {
            let line_text = replace_timestamp(&item.first_line_text, item.start_minutes, item.end_minutes)
                .unwrap_or_else(|| format_list_line(item.start_minutes, item.end_minutes, &item.text));

            let block = if needs_heading {
                format!("{}\n\n{}", self.create_planner_heading(), line_text)
            } else if after_heading {
                format!("\n{}", line_text)
            } else {
                line_text.clone()
            };

            let ch = self.host.get_line(path, anchor)?.chars().count();
            let at = TextRange::at(TextPosition::new(anchor, ch));
            self.host.replace_range(path, at, &format!("\n{}", block))?;

            // The item line is the last line of the block
            anchor += block.matches('\n').count() + 1;
            needs_heading = false;
            after_heading = false;

            let inserted = TextRange {
                start: TextPosition::new(anchor, 0),
                end: TextPosition::new(anchor, line_text.chars().count()),
            };
            self.host.select_range(path, inserted)?;
        }

        Ok(())
    }
}

/// Rewrite the timestamp on each listed line; lines without one are left as they are.
fn retime_lines(text: &str, retimed: &[(usize, i32, i32)]) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for &(idx, start, end) in retimed {
        if let Some(line) = lines.get_mut(idx)
            && let Some(new_line) = replace_timestamp(line, start, end)
        {
            *line = new_line;
        }
    }
    lines.join("\n")
}
