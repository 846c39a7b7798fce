use std::sync::Arc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::engine::catchup::ENERGY_REGEN_SECS;
use crate::engine::{actions, catch_up, effective_points_per_click, format_number, save_data, tiers, upgrade_cost};
use crate::error::GameError;
use crate::store::PlayerStore;
use crate::types::*;

/// Runs one request's worth of game logic against the store:
/// load or create, catch up to now, apply the action, persist, render.
pub struct StateManager {
    store: Arc<dyn PlayerStore>,
    clock: Arc<dyn Clock>,
}

impl StateManager {
    pub fn new(store: Arc<dyn PlayerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Loads the player (creating it on first reference) and applies catch-up.
    /// Catch-up results are written back before any action runs.
    async fn checkout(&self, player_id: &str) -> Result<PlayerRecord, GameError> {
        let now = self.clock.now();

        let mut player = match self.store.get(player_id).await? {
            Some(player) => player,
            None => {
                let player = PlayerRecord::new(player_id.to_string(), now);
                self.store.put(&player).await?;
                info!("🆕 New player {}", player_id);
                player
            }
        };

        // Anchors can move even when energy is already full, so compare records
        let before = player.clone();
        let report = catch_up(&mut player, now);
        if player != before {
            if report.changed() {
                debug!(
                    "Catch-up for {}: +{} energy, +{} points ({} passive clicks)",
                    player_id, report.energy_gained, report.passive_points, report.passive_clicks
                );
            }
            self.store.put(&player).await?;
        }

        Ok(player)
    }

    pub async fn get_player(&self, player_id: &str) -> Result<PlayerView, GameError> {
        let player = self.checkout(player_id).await?;
        Ok(player_view(&player))
    }

    pub async fn click(&self, player_id: &str) -> Result<ClickResponse, GameError> {
        let mut player = self.checkout(player_id).await?;

        let outcome = actions::click(&mut player, self.clock.now()).map_err(|e| {
            warn!("Click rejected for {}: {}", player_id, e);
            e
        })?;
        self.store.put(&player).await?;

        Ok(ClickResponse {
            success: true,
            points_earned: outcome.points_earned,
            new_points: outcome.points,
            new_points_formatted: format_number(outcome.points),
            new_energy: outcome.energy,
        })
    }

    pub async fn purchase_upgrade(
        &self,
        player_id: &str,
        upgrade_level: i64,
    ) -> Result<UpgradeResponse, GameError> {
        let mut player = self.checkout(player_id).await?;

        let outcome = u32::try_from(upgrade_level)
            .map_err(|_| GameError::InvalidUpgradeLevel)
            .and_then(|expected| {
                actions::purchase_upgrade(&mut player, expected, self.clock.now())
            })
            .map_err(|e| {
                warn!("Upgrade {} rejected for {}: {}", upgrade_level, player_id, e);
                e
            })?;
        self.store.put(&player).await?;

        info!(
            "⬆️  {} bought upgrade {} for {}",
            player_id,
            outcome.upgrade_level,
            format_number(outcome.cost)
        );

        Ok(UpgradeResponse {
            success: true,
            new_points: outcome.points,
            new_points_formatted: format_number(outcome.points),
            new_upgrade_level: outcome.upgrade_level,
            new_points_per_click: outcome.points_per_click,
        })
    }

    pub async fn advance(&self, player_id: &str) -> Result<AdvanceResponse, GameError> {
        let mut player = self.checkout(player_id).await?;

        let tier = actions::advance(&mut player, self.clock.now()).map_err(|e| {
            warn!("Advancement rejected for {}: {}", player_id, e);
            e
        })?;
        self.store.put(&player).await?;

        info!("🥋 {} advanced to {} (level {})", player_id, tier.name, tier.level);

        Ok(AdvanceResponse {
            success: true,
            new_character_level: tier.level,
            new_character_name: tier.name.to_string(),
            new_character_multiplier: tier.multiplier,
            new_max_energy: tier.max_energy,
        })
    }

    pub async fn save(&self, player_id: &str) -> Result<SaveResponse, GameError> {
        let mut player = self.checkout(player_id).await?;

        let now = self.clock.now();
        actions::mark_saved(&mut player, now);
        self.store.put(&player).await?;

        Ok(SaveResponse {
            success: true,
            message: "Game saved successfully".to_string(),
            save_time: iso_timestamp(now),
            save_time_formatted: human_timestamp(now),
        })
    }

    pub async fn export(&self, player_id: &str) -> Result<ExportResponse, GameError> {
        let player = self.checkout(player_id).await?;
        let (snapshot, info) = save_data::export_snapshot(&player, self.clock.now());

        Ok(ExportResponse {
            success: true,
            save_data: snapshot,
            export_info: info,
        })
    }

    /// Replaces the player's record wholesale with the imported blob.
    pub async fn import(
        &self,
        player_id: &str,
        blob: &Map<String, Value>,
    ) -> Result<ImportResponse, GameError> {
        let player = save_data::import_record(player_id, blob, self.clock.now()).map_err(|e| {
            warn!("Import rejected for {}: {}", player_id, e);
            e
        })?;
        self.store.put(&player).await?;

        info!(
            "📥 Imported save for {}: {} points, level {}",
            player_id, player.points, player.character_level
        );

        Ok(ImportResponse {
            success: true,
            message: "Save data imported successfully".to_string(),
            imported_data: ImportedData {
                points: player.points,
                character_level: player.character_level,
                character_name: player.tier().name.to_string(),
                upgrade_level: player.upgrade_level,
            },
        })
    }
}

pub fn player_view(player: &PlayerRecord) -> PlayerView {
    let tier = player.tier();
    let next_upgrade_cost = upgrade_cost(player.upgrade_level);
    let can_advance = !tiers::is_terminal(player.character_level)
        && tier
            .advancement_cost
            .map_or(false, |cost| player.points >= cost as f64);
    let last_save = player.last_save_or_fallback();

    PlayerView {
        player_id: player.player_id.clone(),
        points: player.points,
        points_formatted: format_number(player.points),
        energy: player.energy,
        max_energy: tier.max_energy,
        character_level: player.character_level,
        character_name: tier.name.to_string(),
        character_multiplier: tier.multiplier,
        upgrade_level: player.upgrade_level,
        points_per_click: effective_points_per_click(player.upgrade_level, player.character_level),
        next_upgrade_cost,
        next_upgrade_cost_formatted: format_number(next_upgrade_cost),
        advancement_cost: tier.advancement_cost,
        advancement_cost_formatted: tier.advancement_cost.map(|cost| format_number(cost as f64)),
        can_advance,
        energy_regen_seconds: u64::from(tier.max_energy.saturating_sub(player.energy))
            * ENERGY_REGEN_SECS as u64,
        last_save: iso_timestamp(last_save),
        last_save_formatted: human_timestamp(last_save),
    }
}
