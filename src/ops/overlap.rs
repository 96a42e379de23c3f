use indexmap::IndexMap;

use crate::model::plan_item::{PlanItem, Placing};

/// Items whose time ranges transitively intersect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapGroup {
    /// Member ids in sweep order (start time, then id)
    pub ids: Vec<String>,
    pub start_minutes: i32,
    pub end_minutes: i32,
}

/// Sweep order: start time, ties broken by id so layout does not depend on input order.
fn sweep_order(items: &[PlanItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .start_minutes
            .cmp(&items[b].start_minutes)
            .then_with(|| items[a].id.cmp(&items[b].id))
    });
    order
}

/// Connected components of the overlap graph, as indices into `items`.
fn component_indices(items: &[PlanItem]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_end = i32::MIN;

    for idx in sweep_order(items) {
        let item = &items[idx];
        match groups.last_mut() {
            Some(group) if item.start_minutes < group_end => {
                group.push(idx);
                group_end = group_end.max(item.end_minutes);
            }
            _ => {
                groups.push(vec![idx]);
                group_end = item.end_minutes;
            }
        }
    }

    groups
}

/// Group items that overlap each other, directly or through a chain of overlaps.
/// Items that overlap nothing form single-member groups.
pub fn overlap_groups(items: &[PlanItem]) -> Vec<OverlapGroup> {
    component_indices(items)
        .into_iter()
        .map(|group| OverlapGroup {
            ids: group.iter().map(|&i| items[i].id.clone()).collect(),
            start_minutes: group
                .iter()
                .map(|&i| items[i].start_minutes)
                .min()
                .unwrap_or(0),
            end_minutes: group
                .iter()
                .map(|&i| items[i].end_minutes)
                .max()
                .unwrap_or(0),
        })
        .collect()
}

/// Assign every item a lane within its overlap group.
///
/// Lanes are handed out earliest-start-first; a lane is reused as soon as its
/// previous occupant has ended. Every member of a group reports the group's
/// lane count so overlapping items render at equal widths.
pub fn compute_overlap(items: &[PlanItem]) -> IndexMap<String, Placing> {
    let mut placings = IndexMap::with_capacity(items.len());

    for group in component_indices(items) {
        let mut lane_ends: Vec<i32> = Vec::new();
        let mut assigned: Vec<(usize, usize)> = Vec::with_capacity(group.len());

        for idx in group {
            let item = &items[idx];
            let lane = match lane_ends.iter().position(|&end| end <= item.start_minutes) {
                Some(free) => {
                    lane_ends[free] = item.end_minutes;
                    free
                }
                None => {
                    lane_ends.push(item.end_minutes);
                    lane_ends.len() - 1
                }
            };
            assigned.push((idx, lane));
        }

        let lanes = lane_ends.len();
        for (idx, lane) in assigned {
            placings.insert(items[idx].id.clone(), Placing { lane, lanes });
        }
    }

    placings
}

/// Return `items` with `placing` recomputed for the whole set
pub fn add_placing(items: Vec<PlanItem>) -> Vec<PlanItem> {
    let placings = compute_overlap(&items);
    items
        .into_iter()
        .map(|mut item| {
            item.placing = placings.get(&item.id).copied().unwrap_or_default();
            item
        })
        .collect()
}
