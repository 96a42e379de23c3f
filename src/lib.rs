//! Timeline editing engine for markdown day plans.
//!
//! The [`ops::edit::EditSession`] turns continuous pointer input into edited
//! plan items, and [`ops::plan_editor::PlanEditor`] writes the confirmed result
//! back into the daily note through an [`io::host::DocumentHost`].

pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod util;
