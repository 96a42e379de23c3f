use crate::model::plan_item::{Location, MINUTES_IN_DAY, Placing, PlanItem};
use crate::parse::outline::Outline;
use crate::parse::timestamp::parse_timestamp_line;

/// Parse the plan items listed under `heading`.
///
/// An item without an explicit end runs until the next item starts, or for
/// `default_duration` minutes when it is the last one. Items are returned in
/// document order with ids of the form `path:line`.
pub fn parse_plan_items(
    source: &str,
    outline: &Outline,
    heading: &str,
    path: &str,
    default_duration: i32,
) -> Vec<PlanItem> {
    let lines: Vec<&str> = source.lines().collect();

    let parsed: Vec<_> = outline
        .list_items_under_heading(heading)
        .into_iter()
        .filter_map(|item| {
            let line = lines.get(item.line)?;
            parse_timestamp_line(line).map(|ts| (item.line, *line, ts))
        })
        .collect();

    let mut items = Vec::with_capacity(parsed.len());
    for (i, (line_idx, line, ts)) in parsed.iter().enumerate() {
        let next_start = parsed.get(i + 1).map(|(_, _, next)| next.start_minutes);
        let end = match (ts.end_minutes, next_start) {
            (Some(end), _) if end > ts.start_minutes => end,
            (None, Some(next)) if next > ts.start_minutes => next,
            _ => (ts.start_minutes + default_duration).min(MINUTES_IN_DAY),
        };
        if end <= ts.start_minutes {
            continue;
        }

        items.push(PlanItem {
            id: format!("{}:{}", path, line_idx),
            text: ts.text().to_string(),
            start_minutes: ts.start_minutes,
            end_minutes: end,
            location: Location::new(path, Some(*line_idx)),
            first_line_text: line.to_string(),
            placing: Placing::default(),
        });
    }

    items
}
