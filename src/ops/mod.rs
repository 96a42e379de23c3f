pub mod edit;
pub mod overlap;
pub mod plan_editor;

pub use edit::{EditSession, PointerEvent, apply_edit};
pub use overlap::{OverlapGroup, add_placing, compute_overlap, overlap_groups};
pub use plan_editor::{FileChanges, FileOutcome, PlanEditor, SyncError, SyncReport};
