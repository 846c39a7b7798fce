//! Progression engine: pure functions over a `PlayerRecord` and an instant.
//!
//! Callers bring the record up to date with `catchup::catch_up` before
//! applying any action, so every figure they return reflects "now".

pub mod actions;
pub mod catchup;
pub mod formulas;
pub mod save_data;
pub mod tiers;

pub use catchup::catch_up;
pub use formulas::{effective_points_per_click, format_number, upgrade_cost};
