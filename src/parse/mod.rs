pub mod outline;
pub mod plan_parser;
pub mod timestamp;

pub use outline::{Heading, ListItem, Outline, parse_outline};
pub use plan_parser::parse_plan_items;
pub use timestamp::{format_list_line, parse_timestamp_line, replace_timestamp};
