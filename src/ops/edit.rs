use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::model::config::PlannerConfig;
use crate::model::edit::{EditMode, EditOperation};
use crate::model::plan_item::{Location, MINUTES_IN_DAY, Placing, PlanItem};
use crate::ops::overlap::add_placing;
use crate::parse::timestamp::format_list_line;
use crate::util::clock::{Clock, SystemClock};
use crate::util::time::{offset_to_minutes, snap};

/// Text given to items created by dragging on empty timeline space
pub const NEW_ITEM_TEXT: &str = "New item";

/// Pointer input delivered to a session over a channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to this vertical offset
    Moved(f64),
    /// Pointer released over the timeline: keep the edit
    Confirm,
    /// Edit aborted (pointer left the timeline, escape, host abort)
    Cancel,
}

// ---------------------------------------------------------------------------
// Pure edit transformation
// ---------------------------------------------------------------------------

/// Minutes the pointer has travelled since the edit started, snapped.
pub fn edit_delta(op: &EditOperation, pointer_offset: f64, config: &PlannerConfig) -> i32 {
    let travelled =
        offset_to_minutes(pointer_offset, config) - offset_to_minutes(op.start_offset, config);
    snap(travelled, config.snap_step_minutes)
}

/// Compute the displayed list for `baseline` with `op` applied at `pointer_offset`.
///
/// Pure: the baseline is never touched and the same inputs always give the same
/// list. Placings are recomputed for the result.
pub fn apply_edit(
    baseline: &[PlanItem],
    op: &EditOperation,
    pointer_offset: f64,
    config: &PlannerConfig,
) -> Vec<PlanItem> {
    let delta = edit_delta(op, pointer_offset, config);

    let edited = match op.mode {
        EditMode::Create => {
            let mut items = baseline.to_vec();
            if let Some(pending) = &op.pending {
                let (start, end) = target_times(op, delta, config);
                items.push(pending.with_times(start, end));
            }
            items
        }
        mode if mode.shifts_others() => shift_with_cap(baseline, op, delta, config),
        _ => {
            let (start, end) = target_times(op, delta, config);
            retime_target(baseline, op, start, end)
        }
    };

    add_placing(edited)
}

/// Where the target lands for `delta`, clamped to the day and the minimum duration
fn target_times(op: &EditOperation, delta: i32, config: &PlannerConfig) -> (i32, i32) {
    match op.mode {
        EditMode::Drag | EditMode::DragAndShiftOthers => drag_times(op, delta),
        EditMode::ResizeStart => resize_start_times(op, delta, config),
        EditMode::ResizeEnd | EditMode::ResizeAndShiftOthers | EditMode::Create => {
            resize_end_times(op, delta, config)
        }
    }
}

fn drag_times(op: &EditOperation, delta: i32) -> (i32, i32) {
    let duration = op.end_minutes - op.start_minutes;
    let latest_start = (MINUTES_IN_DAY - duration).max(0);
    let start = op.start_minutes.saturating_add(delta).clamp(0, latest_start);
    (start, start + duration)
}

fn resize_start_times(op: &EditOperation, delta: i32, config: &PlannerConfig) -> (i32, i32) {
    let start = op
        .start_minutes
        .saturating_add(delta)
        .min(op.end_minutes - config.minimum_duration_minutes)
        .max(0);
    (start, op.end_minutes)
}

fn resize_end_times(op: &EditOperation, delta: i32, config: &PlannerConfig) -> (i32, i32) {
    let end = op
        .end_minutes
        .saturating_add(delta)
        .max(op.start_minutes + config.minimum_duration_minutes)
        .min(MINUTES_IN_DAY);
    (op.start_minutes, end)
}

fn retime_target(baseline: &[PlanItem], op: &EditOperation, start: i32, end: i32) -> Vec<PlanItem> {
    baseline
        .iter()
        .map(|item| {
            if item.id == op.task_id {
                item.with_times(start, end)
            } else {
                item.clone()
            }
        })
        .collect()
}

/// New position of a pushed neighbour: (index into baseline, start, end)
type Push = (usize, i32, i32);

/// Move the target, then push the chain of neighbours it runs into.
///
/// The whole cascade is capped at the day boundaries: if the last pushed item
/// would cross 00:00 or 24:00, the delta shrinks by the overshoot and the chain
/// is recomputed, so the target stops once there is no more room.
fn shift_with_cap(
    baseline: &[PlanItem],
    op: &EditOperation,
    mut delta: i32,
    config: &PlannerConfig,
) -> Vec<PlanItem> {
    // Each pass removes the overshoot of one chain; the chain can't get longer
    // than the list, so this always settles.
    for _ in 0..=baseline.len() {
        let (start, end) = target_times(op, delta, config);
        // Work from what the target really moved; past the day edge the raw
        // delta is larger than that
        delta = match op.mode {
            EditMode::ResizeAndShiftOthers => end - op.end_minutes,
            _ => start - op.start_minutes,
        };

        let (pushes, overshoot) = if end > op.end_minutes {
            push_forward(baseline, op, end)
        } else if start < op.start_minutes {
            push_backward(baseline, op, start)
        } else {
            (Vec::new(), 0)
        };

        if overshoot == 0 {
            let mut edited = retime_target(baseline, op, start, end);
            for (idx, new_start, new_end) in pushes {
                edited[idx] = baseline[idx].with_times(new_start, new_end);
            }
            return edited;
        }

        trace!(delta, overshoot, "cascade hit the day boundary");
        // Never past zero: at zero travel nothing is pushed, so the loop ends
        delta = if overshoot > 0 {
            (delta - overshoot).max(0)
        } else {
            (delta - overshoot).min(0)
        };
    }

    baseline.to_vec()
}

/// Whether `item` already overlapped the target before the edit. Those items
/// stay where they are; only new overlaps push.
fn overlapped_at_start(item: &PlanItem, op: &EditOperation) -> bool {
    item.start_minutes < op.end_minutes && op.start_minutes < item.end_minutes
}

/// Push items at or below the target's original start so each abuts the
/// previous chain member. Returns the pushes and how far the chain runs past
/// the end of the day (0 when it fits).
fn push_forward(baseline: &[PlanItem], op: &EditOperation, target_end: i32) -> (Vec<Push>, i32) {
    let mut below: Vec<usize> = baseline
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.id != op.task_id
                && item.start_minutes >= op.start_minutes
                && !overlapped_at_start(item, op)
        })
        .map(|(idx, _)| idx)
        .collect();
    below.sort_by(|&a, &b| {
        baseline[a]
            .start_minutes
            .cmp(&baseline[b].start_minutes)
            .then_with(|| baseline[a].id.cmp(&baseline[b].id))
    });

    let mut pushes = Vec::new();
    let mut cursor = target_end;
    for idx in below {
        let item = &baseline[idx];
        if item.start_minutes >= cursor {
            break;
        }
        let new_end = cursor + item.duration_minutes();
        pushes.push((idx, cursor, new_end));
        cursor = new_end;
    }

    (pushes, (cursor - MINUTES_IN_DAY).max(0))
}

/// Mirror of [`push_forward`] for items above the target. The overshoot is
/// negative when the chain would start before midnight.
fn push_backward(
    baseline: &[PlanItem],
    op: &EditOperation,
    target_start: i32,
) -> (Vec<Push>, i32) {
    let mut above: Vec<usize> = baseline
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.id != op.task_id
                && item.start_minutes < op.start_minutes
                && !overlapped_at_start(item, op)
        })
        .map(|(idx, _)| idx)
        .collect();
    above.sort_by(|&a, &b| {
        baseline[b]
            .end_minutes
            .cmp(&baseline[a].end_minutes)
            .then_with(|| baseline[a].id.cmp(&baseline[b].id))
    });

    let mut pushes = Vec::new();
    let mut cursor = target_start;
    for idx in above {
        let item = &baseline[idx];
        if item.end_minutes <= cursor {
            break;
        }
        let new_start = cursor - item.duration_minutes();
        pushes.push((idx, new_start, cursor));
        cursor = new_start;
    }

    (pushes, cursor.min(0))
}

// ---------------------------------------------------------------------------
// Edit session
// ---------------------------------------------------------------------------

/// Holds the confirmed (baseline) plan and at most one active edit.
///
/// The displayed list is derived: it equals the baseline while idle, and is
/// recomputed from (baseline, operation, pointer offset) on every pointer move
/// while editing. Only [`EditSession::confirm_edit`] changes the baseline.
pub struct EditSession<C: Clock = SystemClock> {
    config: PlannerConfig,
    clock: C,
    baseline: Vec<PlanItem>,
    operation: Option<EditOperation>,
    pointer_offset: f64,
    displayed: Vec<PlanItem>,
    created: usize,
}

impl<C: Clock> EditSession<C> {
    pub fn new(config: PlannerConfig, clock: C, items: Vec<PlanItem>) -> Self {
        let baseline = add_placing(items);
        EditSession {
            config: config.normalized(),
            clock,
            displayed: baseline.clone(),
            baseline,
            operation: None,
            pointer_offset: 0.0,
            created: 0,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn baseline(&self) -> &[PlanItem] {
        &self.baseline
    }

    pub fn displayed_tasks(&self) -> &[PlanItem] {
        &self.displayed
    }

    pub fn operation(&self) -> Option<&EditOperation> {
        self.operation.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.operation.is_some()
    }

    pub fn pointer_offset(&self) -> f64 {
        self.pointer_offset
    }

    /// Feed a new pointer position. Has no visible effect while idle.
    pub fn set_pointer_offset(&mut self, offset: f64) {
        self.pointer_offset = offset;
        if let Some(op) = &self.operation {
            self.displayed = apply_edit(&self.baseline, op, offset, &self.config);
            trace!(offset, task_id = %op.task_id, "recomputed displayed tasks");
        }
    }

    /// Begin editing `item`. Returns false if the edit was not started: another
    /// item is already being edited, or `item` is not part of the baseline.
    ///
    /// Calling this again for the item already being edited switches the mode
    /// and keeps the original reference point.
    pub fn start_edit(&mut self, item: &PlanItem, mode: EditMode) -> bool {
        if mode == EditMode::Create {
            debug!(task_id = %item.id, "create edits start through start_create");
            return false;
        }

        if let Some(op) = &self.operation {
            if op.task_id != item.id || op.mode == EditMode::Create {
                debug!(
                    active = %op.task_id,
                    requested = %item.id,
                    "edit already in progress, ignoring start"
                );
                return false;
            }
            let switched = EditOperation {
                mode,
                ..op.clone()
            };
            debug!(task_id = %item.id, %mode, "edit mode switched");
            self.operation = Some(switched);
            self.set_pointer_offset(self.pointer_offset);
            return true;
        }

        let Some(current) = self.baseline.iter().find(|t| t.id == item.id) else {
            debug!(task_id = %item.id, "cannot edit item outside the baseline");
            return false;
        };

        self.operation = Some(EditOperation {
            task_id: current.id.clone(),
            mode,
            start_offset: self.pointer_offset,
            start_minutes: current.start_minutes,
            end_minutes: current.end_minutes,
            pending: None,
        });
        debug!(task_id = %item.id, %mode, offset = self.pointer_offset, "edit started");
        self.set_pointer_offset(self.pointer_offset);
        true
    }

    /// Start stretching a new item out of the current pointer position.
    /// Returns the new item's id, or `None` while another edit is active.
    pub fn start_create(&mut self) -> Option<String> {
        if let Some(op) = &self.operation {
            debug!(active = %op.task_id, "edit already in progress, ignoring create");
            return None;
        }

        let min = self.config.minimum_duration_minutes;
        let duration = self.config.default_duration_minutes.max(min);
        let start = snap(
            offset_to_minutes(self.pointer_offset, &self.config),
            self.config.snap_step_minutes,
        )
        .clamp(0, (MINUTES_IN_DAY - duration).max(0));
        let end = (start + duration).min(MINUTES_IN_DAY);

        let id = self.next_new_id();
        let path = self.config.daily_note_path(self.clock.today());
        let pending = PlanItem {
            id: id.clone(),
            text: NEW_ITEM_TEXT.to_string(),
            start_minutes: start,
            end_minutes: end,
            location: Location::new(path, None),
            first_line_text: format_list_line(start, end, NEW_ITEM_TEXT),
            placing: Placing::default(),
        };

        self.operation = Some(EditOperation {
            task_id: id.clone(),
            mode: EditMode::Create,
            start_offset: self.pointer_offset,
            start_minutes: start,
            end_minutes: end,
            pending: Some(pending),
        });
        debug!(task_id = %id, start, end, "create started");
        self.set_pointer_offset(self.pointer_offset);
        Some(id)
    }

    fn next_new_id(&mut self) -> String {
        loop {
            self.created += 1;
            let id = format!("new-{}", self.created);
            if !self.baseline.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }

    /// Fold the active edit into the baseline. Returns false when idle.
    pub fn confirm_edit(&mut self) -> bool {
        let Some(op) = self.operation.take() else {
            return false;
        };
        self.baseline = self.displayed.clone();
        debug!(task_id = %op.task_id, mode = %op.mode, "edit confirmed");
        true
    }

    /// Drop the active edit; the display returns to the baseline.
    pub fn cancel_edit(&mut self) {
        if let Some(op) = self.operation.take() {
            debug!(task_id = %op.task_id, mode = %op.mode, "edit cancelled");
        }
        self.displayed = self.baseline.clone();
    }

    /// Adopt a freshly parsed plan. Ignored (returns false) while editing.
    pub fn replace_baseline(&mut self, items: Vec<PlanItem>) -> bool {
        if self.operation.is_some() {
            return false;
        }
        self.baseline = add_placing(items);
        self.displayed = self.baseline.clone();
        true
    }

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved(offset) => self.set_pointer_offset(offset),
            PointerEvent::Confirm => {
                self.confirm_edit();
            }
            PointerEvent::Cancel => self.cancel_edit(),
        }
    }

    /// Apply every queued pointer event without blocking.
    /// Returns the number of events handled.
    pub fn drain(&mut self, rx: &Receiver<PointerEvent>) -> usize {
        let mut handled = 0;
        while let Ok(event) = rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::clock::FixedClock;
    use crate::util::time::{minutes_to_offset, parse_minutes};
    use chrono::NaiveDate;
    use std::sync::mpsc;

    fn config() -> PlannerConfig {
        PlannerConfig {
            zoom_level: 1.0,
            start_hour: 0,
            ..PlannerConfig::default()
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
    }

    fn t(s: &str) -> i32 {
        parse_minutes(s).unwrap()
    }

    fn item(id: &str, start: &str, end: &str) -> PlanItem {
        PlanItem {
            id: id.to_string(),
            text: format!("Task {}", id),
            start_minutes: t(start),
            end_minutes: t(end),
            location: Location::new("2026-10-17.md", Some(0)),
            first_line_text: format!("- [ ] {} - {} Task {}", start, end, id),
            placing: Placing::default(),
        }
    }

    fn base_item() -> PlanItem {
        item("1", "00:00", "01:00")
    }

    fn session(items: Vec<PlanItem>) -> EditSession<FixedClock> {
        EditSession::new(config(), clock(), items)
    }

    fn offset(time: &str) -> f64 {
        minutes_to_offset(t(time), &config())
    }

    fn times(item: &PlanItem) -> (i32, i32) {
        (item.start_minutes, item.end_minutes)
    }

    // --- common edit mechanics ---

    #[test]
    fn test_no_edit_pointer_does_nothing() {
        let mut s = session(vec![base_item()]);
        s.set_pointer_offset(200.0);
        assert_eq!(s.displayed_tasks(), s.baseline());
        assert_eq!(s.displayed_tasks(), &[base_item()]);
    }

    #[test]
    fn test_drag_follows_pointer() {
        let mut s = session(vec![base_item()]);
        assert!(s.start_edit(&base_item(), EditMode::Drag));
        s.set_pointer_offset(offset("09:00"));

        assert_eq!(times(&s.displayed_tasks()[0]), (t("09:00"), t("10:00")));
        // Baseline untouched until confirmation
        assert_eq!(times(&s.baseline()[0]), (t("00:00"), t("01:00")));
    }

    #[test]
    fn test_confirm_freezes_tasks() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(offset("09:00"));
        assert!(s.confirm_edit());
        s.set_pointer_offset(offset("10:00"));

        assert!(!s.is_editing());
        assert_eq!(times(&s.displayed_tasks()[0]), (t("09:00"), t("10:00")));
        assert_eq!(times(&s.baseline()[0]), (t("09:00"), t("10:00")));
    }

    #[test]
    fn test_cancel_reverts_to_baseline() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(offset("09:00"));
        s.cancel_edit();

        assert!(!s.is_editing());
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:00"), t("01:00")));
        assert!(!s.confirm_edit());
    }

    #[test]
    fn test_second_edit_is_rejected() {
        let other = item("2", "03:00", "04:00");
        let mut s = session(vec![base_item(), other.clone()]);
        assert!(s.start_edit(&base_item(), EditMode::Drag));
        assert!(!s.start_edit(&other, EditMode::Drag));
        assert_eq!(s.operation().unwrap().task_id, "1");
        assert!(s.start_create().is_none());
    }

    #[test]
    fn test_restart_on_same_item_switches_mode() {
        let mut s = session(vec![base_item()]);
        s.set_pointer_offset(offset("00:30"));
        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(offset("01:30"));
        assert!(s.start_edit(&base_item(), EditMode::ResizeEnd));

        let op = s.operation().unwrap();
        assert_eq!(op.mode, EditMode::ResizeEnd);
        assert_eq!(op.start_offset, offset("00:30"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:00"), t("02:00")));
    }

    #[test]
    fn test_unknown_item_is_not_edited() {
        let mut s = session(vec![base_item()]);
        assert!(!s.start_edit(&item("ghost", "05:00", "06:00"), EditMode::Drag));
        assert!(!s.is_editing());
    }

    #[test]
    fn test_delta_is_snapped() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(offset("00:14"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:10"), t("01:10")));
        s.set_pointer_offset(offset("00:15"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:20"), t("01:20")));
    }

    #[test]
    fn test_drag_clamped_to_day() {
        let mut s = session(vec![item("1", "01:00", "02:00")]);
        s.set_pointer_offset(offset("05:00"));
        s.start_edit(&item("1", "01:00", "02:00"), EditMode::Drag);

        s.set_pointer_offset(offset("02:00"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:00"), t("01:00")));

        s.set_pointer_offset(offset("05:00") + 24.0 * 60.0);
        assert_eq!(times(&s.displayed_tasks()[0]), (t("23:00"), t("24:00")));
    }

    // --- resize ---

    #[test]
    fn test_resize_end_clamped_to_minimum_duration() {
        let mut s = session(vec![base_item()]);
        s.set_pointer_offset(offset("02:00"));
        s.start_edit(&base_item(), EditMode::ResizeEnd);
        s.set_pointer_offset(offset("00:20"));

        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:00"), t("00:10")));
    }

    #[test]
    fn test_resize_start_moves_only_start() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::ResizeStart);
        s.set_pointer_offset(offset("00:20"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:20"), t("01:00")));

        s.set_pointer_offset(offset("03:00"));
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:50"), t("01:00")));
    }

    // --- drag many ---

    #[test]
    fn test_tasks_below_shift_once_they_overlap() {
        let next = item("2", "01:10", "02:10");
        let mut s = session(vec![base_item(), next]);
        s.start_edit(&base_item(), EditMode::DragAndShiftOthers);

        s.set_pointer_offset(offset("00:10"));
        assert_eq!(times(&s.displayed_tasks()[1]), (t("01:10"), t("02:10")));

        s.set_pointer_offset(offset("01:10"));
        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("01:10"), t("02:10")));
        assert_eq!(times(&shown[1]), (t("02:10"), t("03:10")));
    }

    #[test]
    fn test_tasks_below_return_once_overlap_is_reversed() {
        let next = item("2", "01:10", "02:10");
        let mut s = session(vec![base_item(), next]);
        s.start_edit(&base_item(), EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("01:30"));
        s.set_pointer_offset(offset("00:00"));

        assert_eq!(times(&s.displayed_tasks()[1]), (t("01:10"), t("02:10")));
    }

    #[test]
    fn test_shift_cascades_through_chain() {
        let items = vec![
            base_item(),
            item("2", "01:00", "01:30"),
            item("3", "01:30", "02:00"),
            item("4", "05:00", "06:00"),
        ];
        let mut s = session(items);
        s.start_edit(&base_item(), EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("00:30"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[1]), (t("01:30"), t("02:00")));
        assert_eq!(times(&shown[2]), (t("02:00"), t("02:30")));
        assert_eq!(times(&shown[3]), (t("05:00"), t("06:00")));
    }

    #[test]
    fn test_tasks_above_shift_the_same_way() {
        let above = item("1", "01:00", "02:00");
        let target = item("2", "03:00", "04:00");
        let mut s = session(vec![above, target.clone()]);
        s.set_pointer_offset(offset("03:00"));
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("01:30"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("00:30"), t("01:30")));
        assert_eq!(times(&shown[1]), (t("01:30"), t("02:30")));
    }

    #[test]
    fn test_tasks_stop_moving_when_no_time_left_above() {
        let above = item("1", "01:00", "02:00");
        let target = item("2", "03:00", "04:00");
        let mut s = session(vec![above, target.clone()]);
        s.set_pointer_offset(offset("03:00"));
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("00:30"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("00:00"), t("01:00")));
        assert_eq!(times(&shown[1]), (t("01:00"), t("02:00")));
    }

    #[test]
    fn test_tasks_stop_moving_when_no_time_left_below() {
        let target = item("1", "22:00", "23:00");
        let below = item("2", "23:00", "23:30");
        let mut s = session(vec![target.clone(), below]);
        s.set_pointer_offset(offset("22:00"));
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("23:00"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("22:30"), t("23:30")));
        assert_eq!(times(&shown[1]), (t("23:30"), t("24:00")));
    }

    #[test]
    fn test_drag_far_past_midnight_keeps_chain_at_day_end() {
        let target = item("1", "22:00", "23:00");
        let below = item("2", "23:00", "23:30");
        let mut s = session(vec![target.clone(), below]);
        s.set_pointer_offset(offset("22:00"));
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("22:00") + 300.0);

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("22:30"), t("23:30")));
        assert_eq!(times(&shown[1]), (t("23:30"), t("24:00")));
    }

    #[test]
    fn test_drag_far_before_midnight_keeps_chain_at_day_start() {
        let above = item("1", "01:00", "02:00");
        let target = item("2", "03:00", "04:00");
        let mut s = session(vec![above, target.clone()]);
        s.set_pointer_offset(offset("03:00"));
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("03:00") - 480.0);

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("00:00"), t("01:00")));
        assert_eq!(times(&shown[1]), (t("01:00"), t("02:00")));
    }

    #[test]
    fn test_resize_and_shift_far_past_midnight() {
        let target = item("1", "22:00", "23:00");
        let below = item("2", "23:00", "23:30");
        let mut s = session(vec![target.clone(), below]);
        s.set_pointer_offset(offset("23:00"));
        s.start_edit(&target, EditMode::ResizeAndShiftOthers);
        s.set_pointer_offset(1e9);

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("22:00"), t("23:30")));
        assert_eq!(times(&shown[1]), (t("23:30"), t("24:00")));
    }

    #[test]
    fn test_items_already_overlapping_stay_put() {
        let target = item("a", "00:00", "01:00");
        let overlapping = item("b", "00:30", "01:30");
        let mut s = session(vec![target.clone(), overlapping]);
        s.start_edit(&target, EditMode::DragAndShiftOthers);
        s.set_pointer_offset(offset("00:10"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("00:10"), t("01:10")));
        assert_eq!(times(&shown[1]), (t("00:30"), t("01:30")));
    }

    #[test]
    fn test_zero_minimum_duration_still_keeps_items_non_empty() {
        let config = PlannerConfig {
            minimum_duration_minutes: 0,
            ..config()
        };
        let mut s = EditSession::new(config, clock(), vec![base_item()]);
        s.start_edit(&base_item(), EditMode::ResizeEnd);
        s.set_pointer_offset(offset("00:00") - 600.0);

        let shown = &s.displayed_tasks()[0];
        assert!(shown.end_minutes > shown.start_minutes);
        assert_eq!(times(shown), (0, 1));
    }

    #[test]
    fn test_huge_pointer_offset_does_not_overflow() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(f64::MAX);
        assert_eq!(times(&s.displayed_tasks()[0]), (t("23:00"), t("24:00")));
        s.set_pointer_offset(f64::MIN);
        assert_eq!(times(&s.displayed_tasks()[0]), (t("00:00"), t("01:00")));
    }

    #[test]
    fn test_resize_and_shift_pushes_below() {
        let next = item("2", "01:00", "02:00");
        let mut s = session(vec![base_item(), next]);
        s.start_edit(&base_item(), EditMode::ResizeAndShiftOthers);
        s.set_pointer_offset(offset("00:30"));

        let shown = s.displayed_tasks();
        assert_eq!(times(&shown[0]), (t("00:00"), t("01:30")));
        assert_eq!(times(&shown[1]), (t("01:30"), t("02:30")));
    }

    // --- create ---

    #[test]
    fn test_create_stretches_new_item() {
        let mut s = session(vec![base_item()]);
        s.set_pointer_offset(offset("09:03"));
        let id = s.start_create().unwrap();

        let created = &s.displayed_tasks()[1];
        assert_eq!(created.id, id);
        assert_eq!(times(created), (t("09:00"), t("09:30")));
        assert_eq!(created.location, Location::new("2026-10-17.md", None));
        assert_eq!(created.first_line_text, "- [ ] 09:00 - 09:30 New item");

        s.set_pointer_offset(offset("09:33"));
        assert_eq!(times(&s.displayed_tasks()[1]), (t("09:00"), t("10:00")));
        assert!(s.confirm_edit());
        assert_eq!(s.baseline().len(), 2);
    }

    #[test]
    fn test_cancelled_create_leaves_no_item() {
        let mut s = session(vec![base_item()]);
        s.start_create();
        assert_eq!(s.displayed_tasks().len(), 2);
        s.cancel_edit();
        assert_eq!(s.displayed_tasks().len(), 1);
    }

    // --- placing & events ---

    #[test]
    fn test_placing_follows_displayed_overlap() {
        let next = item("2", "02:00", "03:00");
        let mut s = session(vec![base_item(), next]);
        assert_eq!(s.displayed_tasks()[0].placing.lanes, 1);

        s.start_edit(&base_item(), EditMode::Drag);
        s.set_pointer_offset(offset("01:30"));
        let shown = s.displayed_tasks();
        assert_eq!(shown[0].placing, Placing { lane: 0, lanes: 2 });
        assert_eq!(shown[1].placing, Placing { lane: 1, lanes: 2 });
    }

    #[test]
    fn test_drain_applies_queued_events() {
        let (tx, rx) = mpsc::channel();
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);

        tx.send(PointerEvent::Moved(offset("02:00"))).unwrap();
        tx.send(PointerEvent::Moved(offset("03:00"))).unwrap();
        tx.send(PointerEvent::Confirm).unwrap();
        tx.send(PointerEvent::Moved(offset("07:00"))).unwrap();

        assert_eq!(s.drain(&rx), 4);
        assert!(!s.is_editing());
        assert_eq!(times(&s.baseline()[0]), (t("03:00"), t("04:00")));
        assert_eq!(s.drain(&rx), 0);
    }

    #[test]
    fn test_replace_baseline_only_while_idle() {
        let mut s = session(vec![base_item()]);
        s.start_edit(&base_item(), EditMode::Drag);
        assert!(!s.replace_baseline(Vec::new()));
        s.cancel_edit();
        assert!(s.replace_baseline(vec![item("9", "10:00", "11:00")]));
        assert_eq!(s.displayed_tasks()[0].id, "9");
    }

    #[test]
    fn test_apply_edit_is_pure() {
        let baseline = add_placing(vec![base_item()]);
        let op = EditOperation {
            task_id: "1".to_string(),
            mode: EditMode::Drag,
            start_offset: 0.0,
            start_minutes: 0,
            end_minutes: 60,
            pending: None,
        };
        let first = apply_edit(&baseline, &op, offset("04:00"), &config());
        let second = apply_edit(&baseline, &op, offset("04:00"), &config());
        assert_eq!(first, second);
        assert_eq!(times(&baseline[0]), (0, 60));
    }
}
