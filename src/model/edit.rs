use super::plan_item::PlanItem;

/// How pointer movement changes the target item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Move the item, keeping its duration
    Drag,
    /// Move the item and push the neighbours it runs into
    DragAndShiftOthers,
    /// Move the start edge only
    ResizeStart,
    /// Move the end edge only
    ResizeEnd,
    /// Move the end edge and push the items below
    ResizeAndShiftOthers,
    /// Stretch a brand-new item out of the pointer position
    Create,
}

impl EditMode {
    /// Modes that move other items besides the target
    pub fn shifts_others(self) -> bool {
        matches!(
            self,
            EditMode::DragAndShiftOthers | EditMode::ResizeAndShiftOthers
        )
    }
}

impl std::fmt::Display for EditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditMode::Drag => write!(f, "drag"),
            EditMode::DragAndShiftOthers => write!(f, "drag-and-shift"),
            EditMode::ResizeStart => write!(f, "resize-start"),
            EditMode::ResizeEnd => write!(f, "resize-end"),
            EditMode::ResizeAndShiftOthers => write!(f, "resize-and-shift"),
            EditMode::Create => write!(f, "create"),
        }
    }
}

/// An in-progress edit. Immutable once started; the pointer offset is a separate input.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOperation {
    pub task_id: String,
    pub mode: EditMode,
    /// Pointer offset when the edit started
    pub start_offset: f64,
    /// Target timing when the edit started
    pub start_minutes: i32,
    pub end_minutes: i32,
    /// The item being created; only set in `Create` mode
    pub pending: Option<PlanItem>,
}
