// dojo-clicker/src/engine/tiers.rs
// Static character tier table

use serde::Serialize;

pub const MIN_CHARACTER_LEVEL: u8 = 1;
pub const MAX_CHARACTER_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterTier {
    pub level: u8,
    pub name: &'static str,
    pub multiplier: u32,
    pub max_energy: u32,
    /// Points required to move to the next tier. `None` on the last tier.
    pub advancement_cost: Option<u64>,
}

static TIERS: [CharacterTier; 5] = [
    CharacterTier {
        level: 1,
        name: "Junior",
        multiplier: 1,
        max_energy: 100,
        advancement_cost: Some(5_000),
    },
    CharacterTier {
        level: 2,
        name: "Deishi",
        multiplier: 2,
        max_energy: 150,
        advancement_cost: Some(5_000_000),
    },
    CharacterTier {
        level: 3,
        name: "Shugo",
        multiplier: 3,
        max_energy: 200,
        advancement_cost: Some(500_000_000),
    },
    CharacterTier {
        level: 4,
        name: "Seishi",
        multiplier: 5,
        max_energy: 250,
        advancement_cost: Some(50_000_000_000),
    },
    CharacterTier {
        level: 5,
        name: "Shihan",
        multiplier: 8,
        max_energy: 300,
        advancement_cost: None,
    },
];

/// Looks up a tier by its 1-based level.
pub fn tier(level: u8) -> Option<&'static CharacterTier> {
    if level < MIN_CHARACTER_LEVEL {
        return None;
    }
    TIERS.get(usize::from(level - 1))
}

/// Tier for a level already known to be valid (stored records, post-validation).
///
/// Out-of-range levels clamp to the nearest tier so a corrupt document can
/// never index outside the table.
pub fn tier_for(level: u8) -> &'static CharacterTier {
    let clamped = level.clamp(MIN_CHARACTER_LEVEL, MAX_CHARACTER_LEVEL);
    &TIERS[usize::from(clamped - 1)]
}

pub fn max_energy(level: u8) -> u32 {
    tier_for(level).max_energy
}

pub fn multiplier(level: u8) -> u32 {
    tier_for(level).multiplier
}

pub fn is_terminal(level: u8) -> bool {
    level >= MAX_CHARACTER_LEVEL
}
