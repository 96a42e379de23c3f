use serde::{Deserialize, Serialize};

/// Minutes in one day; the timeline never extends past this.
pub const MINUTES_IN_DAY: i32 = 24 * 60;

/// Where a plan item lives in the vault
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Vault-relative path of the note
    pub path: String,
    /// 0-indexed line of the item's first line. `None` until the item is written.
    pub line: Option<usize>,
}

impl Location {
    pub fn new(path: impl Into<String>, line: Option<usize>) -> Self {
        Location {
            path: path.into(),
            line,
        }
    }
}

/// Horizontal placement of an item among the items it overlaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    /// 0-based column
    pub lane: usize,
    /// Number of columns in the item's overlap group
    pub lanes: usize,
}

impl Default for Placing {
    fn default() -> Self {
        Placing { lane: 0, lanes: 1 }
    }
}

impl Placing {
    /// Share of the timeline width this item occupies
    pub fn width_fraction(&self) -> f64 {
        1.0 / self.lanes.max(1) as f64
    }

    /// Left edge as a share of the timeline width
    pub fn offset_fraction(&self) -> f64 {
        self.lane as f64 * self.width_fraction()
    }
}

/// A time block on the day's timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    /// Task text without list marker, checkbox and timestamp
    pub text: String,
    /// Minutes since midnight
    pub start_minutes: i32,
    /// Minutes since midnight, exclusive
    pub end_minutes: i32,
    pub location: Location,
    /// The item's first line as it appears (or will appear) in the note
    pub first_line_text: String,

    /// Render-only, recomputed whenever the list changes
    #[serde(skip)]
    pub placing: Placing,
}

impl PlanItem {
    pub fn duration_minutes(&self) -> i32 {
        self.end_minutes - self.start_minutes
    }

    /// Whether the item is already written to its note
    pub fn is_in_file(&self) -> bool {
        self.location.line.is_some()
    }

    /// Half-open interval intersection
    pub fn overlaps(&self, other: &PlanItem) -> bool {
        self.start_minutes < other.end_minutes && other.start_minutes < self.end_minutes
    }

    pub(crate) fn with_times(&self, start_minutes: i32, end_minutes: i32) -> PlanItem {
        PlanItem {
            start_minutes,
            end_minutes,
            ..self.clone()
        }
    }
}

/// Equality over what ends up in the note; `id` and `placing` are ignored.
impl PartialEq for PlanItem {
    fn eq(&self, other: &Self) -> bool {
        self.start_minutes == other.start_minutes
            && self.end_minutes == other.end_minutes
            && self.location == other.location
            && self.text == other.text
            && self.first_line_text == other.first_line_text
    }
}

impl Eq for PlanItem {}
