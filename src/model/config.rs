use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Planner configuration from dayplan.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Text of the heading that owns the plan list
    #[serde(default = "default_planner_heading")]
    pub planner_heading: String,
    /// Number of `#` used when the heading has to be created
    #[serde(default = "default_planner_heading_level")]
    pub planner_heading_level: usize,
    /// Granularity that pointer deltas snap to
    #[serde(default = "default_snap_step_minutes")]
    pub snap_step_minutes: i32,
    /// No edit may shrink an item below this duration
    #[serde(default = "default_minimum_duration_minutes")]
    pub minimum_duration_minutes: i32,
    /// Duration of an item created by clicking, and of items whose end is not written
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i32,
    /// Pixels per minute on the timeline
    #[serde(default = "default_zoom_level")]
    pub zoom_level: f64,
    /// Hour shown at offset 0 of the timeline
    #[serde(default = "default_start_hour")]
    pub start_hour: i32,
    /// chrono format of a daily note's file stem
    #[serde(default = "default_daily_note_format")]
    pub daily_note_format: String,
    /// Folder that new daily notes live in, relative to the vault root
    #[serde(default)]
    pub daily_notes_folder: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            planner_heading: default_planner_heading(),
            planner_heading_level: default_planner_heading_level(),
            snap_step_minutes: default_snap_step_minutes(),
            minimum_duration_minutes: default_minimum_duration_minutes(),
            default_duration_minutes: default_duration_minutes(),
            zoom_level: default_zoom_level(),
            start_hour: default_start_hour(),
            daily_note_format: default_daily_note_format(),
            daily_notes_folder: String::new(),
        }
    }
}

impl PlannerConfig {
    /// Pull out-of-range values back to the nearest usable one, so no edit can
    /// produce an empty or negative item.
    pub fn normalized(mut self) -> Self {
        self.snap_step_minutes = self.snap_step_minutes.max(1);
        self.minimum_duration_minutes = self.minimum_duration_minutes.max(1);
        self.default_duration_minutes = self
            .default_duration_minutes
            .max(self.minimum_duration_minutes);
        if !(self.zoom_level.is_finite() && self.zoom_level > 0.0) {
            self.zoom_level = default_zoom_level();
        }
        self.start_hour = self.start_hour.clamp(0, 23);
        self.planner_heading_level = self.planner_heading_level.clamp(1, 6);
        self
    }

    /// Vault-relative path of the daily note for `day`
    pub fn daily_note_path(&self, day: NaiveDate) -> String {
        let stem = day.format(&self.daily_note_format).to_string();
        let folder = self.daily_notes_folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}.md", stem)
        } else {
            format!("{}/{}.md", folder, stem)
        }
    }

    /// The day a note belongs to, or `None` if the path is not a daily note
    pub fn daily_note_date(&self, path: &str) -> Option<NaiveDate> {
        let file_name = path.rsplit('/').next()?;
        let stem = file_name.strip_suffix(".md")?;
        NaiveDate::parse_from_str(stem, &self.daily_note_format).ok()
    }
}

fn default_planner_heading() -> String {
    "Day planner".to_string()
}

fn default_planner_heading_level() -> usize {
    1
}

fn default_snap_step_minutes() -> i32 {
    10
}

fn default_minimum_duration_minutes() -> i32 {
    10
}

fn default_duration_minutes() -> i32 {
    30
}

fn default_zoom_level() -> f64 {
    2.0
}

fn default_start_hour() -> i32 {
    6
}

fn default_daily_note_format() -> String {
    "%Y-%m-%d".to_string()
}
