//! Lazy time catch-up.
//!
//! Nothing ticks in the background. Every request first brings the record up
//! to "now" by looking at how long ago each anchor timestamp was and granting
//! whole units of progress. Anchors only move when at least one unit was
//! granted, so partial progress carries over to the next request.

use chrono::{DateTime, Utc};

use super::formulas::{add_points, base_points_per_click};
use super::tiers;
use crate::types::PlayerRecord;

pub const ENERGY_REGEN_SECS: i64 = 10;
pub const PASSIVE_INCOME_SECS: i64 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CatchUpReport {
    pub energy_gained: u32,
    pub passive_clicks: u64,
    pub passive_points: f64,
}

impl CatchUpReport {
    pub fn changed(&self) -> bool {
        self.energy_gained > 0 || self.passive_clicks > 0
    }
}

/// Whole periods of `period_secs` between `since` and `now`. Zero if the
/// clock went backwards.
fn whole_periods(since: DateTime<Utc>, now: DateTime<Utc>, period_secs: i64) -> i64 {
    let elapsed_ms = (now - since).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    elapsed_ms / (period_secs * 1_000)
}

/// One energy per 10 seconds, capped at the tier's max energy.
///
/// Returns the energy actually added.
pub fn regenerate_energy(player: &mut PlayerRecord, now: DateTime<Utc>) -> u32 {
    let periods = whole_periods(player.last_energy_update, now, ENERGY_REGEN_SECS);
    if periods <= 0 {
        return 0;
    }

    let max_energy = tiers::max_energy(player.character_level);
    let gained = u32::try_from(periods).unwrap_or(u32::MAX);
    let new_energy = player.energy.saturating_add(gained).min(max_energy);
    let added = new_energy.saturating_sub(player.energy);

    player.energy = new_energy;
    player.last_energy_update = now;
    added
}

/// One virtual click of yield per full minute. Does not touch energy.
///
/// Returns `(passive_clicks, points_added)`.
pub fn accrue_passive_income(player: &mut PlayerRecord, now: DateTime<Utc>) -> (u64, f64) {
    let periods = whole_periods(player.last_passive_income, now, PASSIVE_INCOME_SECS);
    if periods <= 0 {
        return (0, 0.0);
    }

    let clicks = periods as u64;
    let per_click = base_points_per_click(player.upgrade_level)
        * f64::from(tiers::multiplier(player.character_level));
    let earned = clicks as f64 * per_click;

    player.points = add_points(player.points, earned);
    player.last_passive_income = now;
    (clicks, earned)
}

/// Runs both catch-up rules, energy first.
pub fn catch_up(player: &mut PlayerRecord, now: DateTime<Utc>) -> CatchUpReport {
    let energy_gained = regenerate_energy(player, now);
    let (passive_clicks, passive_points) = accrue_passive_income(player, now);

    CatchUpReport {
        energy_gained,
        passive_clicks,
        passive_points,
    }
}
