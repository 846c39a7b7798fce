// dojo-clicker/src/engine/actions.rs
// Player actions. Each one validates first and only then mutates, so a failed
// action leaves the record exactly as it was.

use chrono::{DateTime, Utc};

use super::formulas::{add_points, effective_points_per_click, upgrade_cost};
use super::tiers::{self, CharacterTier};
use crate::error::GameError;
use crate::types::PlayerRecord;

pub const CLICK_ENERGY_COST: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub points_earned: f64,
    pub points: f64,
    pub energy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeOutcome {
    pub cost: f64,
    pub points: f64,
    pub upgrade_level: u32,
    pub points_per_click: f64,
}

pub fn click(player: &mut PlayerRecord, now: DateTime<Utc>) -> Result<ClickOutcome, GameError> {
    if player.energy < CLICK_ENERGY_COST {
        return Err(GameError::InsufficientEnergy);
    }

    let earned = effective_points_per_click(player.upgrade_level, player.character_level);
    player.points = add_points(player.points, earned);
    player.energy -= CLICK_ENERGY_COST;
    player.last_save = Some(now);

    Ok(ClickOutcome {
        points_earned: earned,
        points: player.points,
        energy: player.energy,
    })
}

/// Buys the next upgrade. `expected_level` must match the stored level; this
/// catches stale clients but is not a compare-and-swap.
pub fn purchase_upgrade(
    player: &mut PlayerRecord,
    expected_level: u32,
    now: DateTime<Utc>,
) -> Result<UpgradeOutcome, GameError> {
    if expected_level != player.upgrade_level {
        return Err(GameError::InvalidUpgradeLevel);
    }

    let cost = upgrade_cost(player.upgrade_level);
    if player.points < cost {
        return Err(GameError::InsufficientPoints);
    }

    player.points -= cost;
    player.upgrade_level += 1;
    player.last_save = Some(now);

    Ok(UpgradeOutcome {
        cost,
        points: player.points,
        upgrade_level: player.upgrade_level,
        points_per_click: effective_points_per_click(player.upgrade_level, player.character_level),
    })
}

/// Prestige: moves to the next tier and wipes points, upgrades and timers.
pub fn advance(
    player: &mut PlayerRecord,
    now: DateTime<Utc>,
) -> Result<&'static CharacterTier, GameError> {
    if tiers::is_terminal(player.character_level) {
        return Err(GameError::MaxLevel);
    }

    let current = player.tier();
    match current.advancement_cost {
        Some(cost) if player.points >= cost as f64 => {}
        _ => return Err(GameError::InsufficientPointsForAdvancement),
    }

    let next = tiers::tier_for(player.character_level + 1);
    player.character_level = next.level;
    player.points = 0.0;
    player.upgrade_level = 0;
    player.energy = next.max_energy;
    player.last_energy_update = now;
    player.last_passive_income = now;
    player.last_save = Some(now);

    Ok(next)
}

pub fn mark_saved(player: &mut PlayerRecord, now: DateTime<Utc>) {
    player.last_save = Some(now);
}
