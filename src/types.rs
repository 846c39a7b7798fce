use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::engine::tiers;

/// Persisted state for one player. The store owns this; the engine works on a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub points: f64,
    pub energy: u32,
    pub character_level: u8,
    pub upgrade_level: u32,
    pub last_energy_update: DateTime<Utc>,
    pub last_passive_income: DateTime<Utc>,
    /// Unset until the first action or explicit save.
    #[serde(default)]
    pub last_save: Option<DateTime<Utc>>,
}

impl PlayerRecord {
    pub fn new(player_id: String, now: DateTime<Utc>) -> Self {
        Self {
            player_id,
            points: 0.0,
            energy: tiers::max_energy(tiers::MIN_CHARACTER_LEVEL),
            character_level: tiers::MIN_CHARACTER_LEVEL,
            upgrade_level: 0,
            last_energy_update: now,
            last_passive_income: now,
            last_save: None,
        }
    }

    pub fn tier(&self) -> &'static tiers::CharacterTier {
        tiers::tier_for(self.character_level)
    }

    /// Last save time for display; records that were never saved report
    /// their last energy update instead.
    pub fn last_save_or_fallback(&self) -> DateTime<Utc> {
        self.last_save.unwrap_or(self.last_energy_update)
    }
}

pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub fn human_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// ========================================
// Request bodies
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRequest {
    pub player_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeRequest {
    pub player_id: String,
    /// Values outside `u32` are rejected as an invalid upgrade level.
    pub upgrade_level: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub player_id: String,
    pub save_data: serde_json::Map<String, serde_json::Value>,
}

// ========================================
// Responses (derived, never stored)
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: String,
    pub points: f64,
    pub points_formatted: String,
    pub energy: u32,
    pub max_energy: u32,
    pub character_level: u8,
    pub character_name: String,
    pub character_multiplier: u32,
    pub upgrade_level: u32,
    pub points_per_click: f64,
    pub next_upgrade_cost: f64,
    pub next_upgrade_cost_formatted: String,
    pub advancement_cost: Option<u64>,
    pub advancement_cost_formatted: Option<String>,
    pub can_advance: bool,
    pub energy_regen_seconds: u64,
    pub last_save: String,
    pub last_save_formatted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickResponse {
    pub success: bool,
    pub points_earned: f64,
    pub new_points: f64,
    pub new_points_formatted: String,
    pub new_energy: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeResponse {
    pub success: bool,
    pub new_points: f64,
    pub new_points_formatted: String,
    pub new_upgrade_level: u32,
    pub new_points_per_click: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub success: bool,
    pub new_character_level: u8,
    pub new_character_name: String,
    pub new_character_multiplier: u32,
    pub new_max_energy: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub save_time: String,
    pub save_time_formatted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub save_data: SaveSnapshot,
    pub export_info: ExportInfo,
}

/// Portable save blob, as produced by export and accepted by import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub player_id: String,
    pub points: f64,
    pub energy: u32,
    pub character_level: u8,
    pub upgrade_level: u32,
    pub last_energy_update: String,
    pub last_passive_income: String,
    pub last_save: String,
    pub export_timestamp: String,
    pub game_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub export_time: String,
    pub character_name: String,
    pub total_progress: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub imported_data: ImportedData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedData {
    pub points: f64,
    pub character_level: u8,
    pub character_name: String,
    pub upgrade_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
