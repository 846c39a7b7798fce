use super::tiers;

pub const BASE_UPGRADE_COST: f64 = 100.0;
pub const UPGRADE_COST_GROWTH: f64 = 2.5;
/// Share of every purchased upgrade's cost that becomes permanent per-click yield.
pub const UPGRADE_YIELD_SHARE: f64 = 0.1;

/// Cost of buying upgrade `level` (moving from `level` to `level + 1`).
///
/// Always an integral value; kept as `f64` because the curve leaves the `u64`
/// range long before players stop buying upgrades.
pub fn upgrade_cost(level: u32) -> f64 {
    if level == 0 {
        return BASE_UPGRADE_COST;
    }
    (BASE_UPGRADE_COST * UPGRADE_COST_GROWTH.powf(f64::from(level))).floor()
}

/// Per-click yield before the tier multiplier.
///
/// Summed upgrade by upgrade rather than in closed form so that the
/// floating-point result is identical to what existing saves were built with.
pub fn base_points_per_click(upgrade_level: u32) -> f64 {
    if upgrade_level == 0 {
        return 1.0;
    }

    let mut total = 0.0;
    for i in 0..upgrade_level {
        total += upgrade_cost(i) * UPGRADE_YIELD_SHARE;
    }
    total
}

pub fn effective_points_per_click(upgrade_level: u32, character_level: u8) -> f64 {
    base_points_per_click(upgrade_level) * f64::from(tiers::multiplier(character_level))
}

/// Whether buying and clicking at `upgrade_level` stays within finite `f64`
/// for every tier. The curve overflows a little past level 769.
pub fn is_playable_level(upgrade_level: u32) -> bool {
    // Cost first: it bounds the level before the yield sum walks it
    upgrade_cost(upgrade_level).is_finite()
        && effective_points_per_click(upgrade_level, tiers::MAX_CHARACTER_LEVEL).is_finite()
}

/// `points + earned`, pinned at `f64::MAX` so a record never holds `inf`.
pub fn add_points(points: f64, earned: f64) -> f64 {
    let total = points + earned;
    if total.is_finite() {
        total
    } else {
        f64::MAX
    }
}

/// Human-readable number with K/M/B/T suffixes. Display only.
pub fn format_number(n: f64) -> String {
    if n < 1_000.0 {
        format!("{}", n.trunc() as i64)
    } else if n < 1_000_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else if n < 1_000_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n < 1_000_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else {
        format!("{:.1}T", n / 1_000_000_000_000.0)
    }
}
