use chrono::{NaiveTime, Timelike};

use crate::model::config::PlannerConfig;
use crate::model::plan_item::MINUTES_IN_DAY;

/// Pointer positions further than this from the timeline origin are pinned to it.
/// Every edit clamps to the day anyway, and the bound keeps the minute
/// arithmetic far from `i32` overflow.
const MAX_OFFSET_MINUTES: f64 = (2 * MINUTES_IN_DAY) as f64;

/// Convert a vertical timeline offset (pixels) to minutes since midnight
pub fn offset_to_minutes(offset: f64, config: &PlannerConfig) -> i32 {
    let zoom = if config.zoom_level > 0.0 {
        config.zoom_level
    } else {
        1.0
    };
    let minutes = (offset / zoom)
        .round()
        .clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES) as i32;
    minutes.saturating_add(config.start_hour.saturating_mul(60))
}

/// Convert minutes since midnight to a vertical timeline offset (pixels)
pub fn minutes_to_offset(minutes: i32, config: &PlannerConfig) -> f64 {
    (minutes - config.start_hour * 60) as f64 * config.zoom_level
}

/// Round `minutes` to the nearest multiple of `step`
pub fn snap(minutes: i32, step: i32) -> i32 {
    if step <= 1 {
        return minutes;
    }
    (minutes as f64 / step as f64).round() as i32 * step
}

/// `HH:MM`, with `24:00` for the end of the day
pub fn format_minutes(minutes: i32) -> String {
    let minutes = minutes.clamp(0, MINUTES_IN_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse `H:MM` / `HH:MM` into minutes since midnight
pub fn parse_minutes(s: &str) -> Option<i32> {
    let s = s.trim();
    if s == "24:00" {
        return Some(MINUTES_IN_DAY);
    }
    let time = NaiveTime::parse_from_str(s, "%H:%M").ok()?;
    Some((time.hour() * 60 + time.minute()) as i32)
}
