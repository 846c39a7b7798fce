//! Export and import of portable save blobs.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::formulas::is_playable_level;
use super::tiers;
use crate::error::GameError;
use crate::types::{
    human_timestamp, iso_timestamp, ExportInfo, PlayerRecord, SaveSnapshot,
};

pub const GAME_VERSION: &str = "1.0";

const REQUIRED_FIELDS: [&str; 4] = ["points", "energy", "character_level", "upgrade_level"];

pub fn export_snapshot(player: &PlayerRecord, now: DateTime<Utc>) -> (SaveSnapshot, ExportInfo) {
    let snapshot = SaveSnapshot {
        player_id: player.player_id.clone(),
        points: player.points,
        energy: player.energy,
        character_level: player.character_level,
        upgrade_level: player.upgrade_level,
        last_energy_update: iso_timestamp(player.last_energy_update),
        last_passive_income: iso_timestamp(player.last_passive_income),
        last_save: iso_timestamp(player.last_save.unwrap_or(now)),
        export_timestamp: iso_timestamp(now),
        game_version: GAME_VERSION.to_string(),
    };

    let info = ExportInfo {
        export_time: human_timestamp(now),
        character_name: player.tier().name.to_string(),
        total_progress: format!("{} points, Level {}", player.points, player.character_level),
    };

    (snapshot, info)
}

/// Validates an externally supplied save blob and builds the record it describes.
///
/// Checks run in a fixed order and the first failure wins:
/// missing fields, character level, energy (against the imported level's cap),
/// then points and upgrade level.
pub fn import_record(
    player_id: &str,
    save_data: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<PlayerRecord, GameError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !save_data.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(GameError::MissingFields(missing));
    }

    let character_level = whole_number(&save_data["character_level"])
        .filter(|level| {
            (f64::from(tiers::MIN_CHARACTER_LEVEL)..=f64::from(tiers::MAX_CHARACTER_LEVEL))
                .contains(level)
        })
        .map(|level| level as u8)
        .ok_or(GameError::InvalidCharacterLevel)?;

    let max_energy = tiers::max_energy(character_level);
    let energy = whole_number(&save_data["energy"])
        .filter(|energy| *energy >= 0.0 && *energy <= f64::from(max_energy))
        .map(|energy| energy as u32)
        .ok_or(GameError::InvalidEnergy)?;

    let points = save_data["points"]
        .as_f64()
        .filter(|points| points.is_finite() && *points >= 0.0)
        .ok_or(GameError::InvalidPointsOrUpgradeLevel)?;
    let upgrade_level = whole_number(&save_data["upgrade_level"])
        .filter(|level| *level >= 0.0 && *level <= f64::from(u32::MAX))
        .map(|level| level as u32)
        .filter(|level| is_playable_level(*level))
        .ok_or(GameError::InvalidPointsOrUpgradeLevel)?;

    // Both anchors fall back to now together if either is unusable
    let (last_energy_update, last_passive_income) = match (
        optional_timestamp(save_data, "last_energy_update", now),
        optional_timestamp(save_data, "last_passive_income", now),
    ) {
        (Some(energy_at), Some(passive_at)) => (energy_at, passive_at),
        _ => (now, now),
    };

    Ok(PlayerRecord {
        player_id: player_id.to_string(),
        points,
        energy,
        character_level,
        upgrade_level,
        last_energy_update,
        last_passive_income,
        last_save: Some(now),
    })
}

/// Numeric value with no fractional part, accepting both `3` and `3.0`.
fn whole_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite() && n.fract() == 0.0)
}

/// Absent fields default to `now`; present but malformed ones yield `None`.
fn optional_timestamp(
    save_data: &Map<String, Value>,
    field: &str,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match save_data.get(field) {
        None => Some(now),
        Some(Value::String(raw)) => parse_timestamp(raw),
        Some(_) => None,
    }
}

/// ISO-8601 with an offset, or without one (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 18, 30, 0).unwrap()
    }

    fn blob(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test blob must be an object"),
        }
    }

    fn valid_blob() -> Map<String, Value> {
        blob(json!({
            "points": 1234.5,
            "energy": 120,
            "character_level": 2,
            "upgrade_level": 3,
            "last_energy_update": "2024-02-10T18:00:00",
            "last_passive_income": "2024-02-10T17:00:00+00:00"
        }))
    }

    #[test]
    fn test_import_valid_blob() {
        let player = import_record("p9", &valid_blob(), now()).unwrap();

        assert_eq!(player.player_id, "p9");
        assert_eq!(player.points, 1234.5);
        assert_eq!(player.energy, 120);
        assert_eq!(player.character_level, 2);
        assert_eq!(player.upgrade_level, 3);
        assert_eq!(
            player.last_energy_update,
            Utc.with_ymd_and_hms(2024, 2, 10, 18, 0, 0).unwrap()
        );
        assert_eq!(
            player.last_passive_income,
            Utc.with_ymd_and_hms(2024, 2, 10, 17, 0, 0).unwrap()
        );
        assert_eq!(player.last_save, Some(now()));
    }

    #[test]
    fn test_import_lists_missing_fields() {
        let data = blob(json!({ "points": 10, "character_level": 1 }));
        match import_record("p", &data, now()) {
            Err(GameError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["energy".to_string(), "upgrade_level".to_string()]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_import_rejects_character_level_out_of_range() {
        for level in [json!(0), json!(6), json!(2.5), json!("3")] {
            let mut data = valid_blob();
            data.insert("character_level".to_string(), level.clone());
            let err = import_record("p", &data, now()).unwrap_err();
            assert!(
                matches!(err, GameError::InvalidCharacterLevel),
                "level {} gave {:?}",
                level,
                err
            );
        }
    }

    #[test]
    fn test_import_checks_energy_against_imported_level() {
        let mut data = valid_blob();
        data.insert("character_level".to_string(), json!(1));
        data.insert("energy".to_string(), json!(120));
        assert!(matches!(
            import_record("p", &data, now()),
            Err(GameError::InvalidEnergy)
        ));

        data.insert("character_level".to_string(), json!(2));
        assert!(import_record("p", &data, now()).is_ok());

        data.insert("energy".to_string(), json!(-1));
        assert!(matches!(
            import_record("p", &data, now()),
            Err(GameError::InvalidEnergy)
        ));
    }

    #[test]
    fn test_import_level_checked_before_energy() {
        let mut data = valid_blob();
        data.insert("character_level".to_string(), json!(7));
        data.insert("energy".to_string(), json!(-50));
        assert!(matches!(
            import_record("p", &data, now()),
            Err(GameError::InvalidCharacterLevel)
        ));
    }

    #[test]
    fn test_import_rejects_negative_points_or_upgrades() {
        let mut data = valid_blob();
        data.insert("points".to_string(), json!(-1));
        assert!(matches!(
            import_record("p", &data, now()),
            Err(GameError::InvalidPointsOrUpgradeLevel)
        ));

        let mut data = valid_blob();
        data.insert("upgrade_level".to_string(), json!(-3));
        assert!(matches!(
            import_record("p", &data, now()),
            Err(GameError::InvalidPointsOrUpgradeLevel)
        ));
    }

    #[test]
    fn test_import_rejects_upgrade_levels_past_the_cost_curve() {
        for level in [json!(800), json!(4_000_000_000u64)] {
            let mut data = valid_blob();
            data.insert("upgrade_level".to_string(), level.clone());
            assert!(
                matches!(
                    import_record("p", &data, now()),
                    Err(GameError::InvalidPointsOrUpgradeLevel)
                ),
                "level {} was accepted",
                level
            );
        }

        let mut data = valid_blob();
        data.insert("upgrade_level".to_string(), json!(769));
        assert_eq!(import_record("p", &data, now()).unwrap().upgrade_level, 769);
    }

    #[test]
    fn test_import_timestamps_default_to_now() {
        let mut data = valid_blob();
        data.remove("last_energy_update");
        data.remove("last_passive_income");
        let player = import_record("p", &data, now()).unwrap();
        assert_eq!(player.last_energy_update, now());
        assert_eq!(player.last_passive_income, now());
    }

    #[test]
    fn test_one_bad_timestamp_resets_both() {
        let mut data = valid_blob();
        data.insert("last_passive_income".to_string(), json!("yesterday-ish"));
        let player = import_record("p", &data, now()).unwrap();
        assert_eq!(player.last_energy_update, now());
        assert_eq!(player.last_passive_income, now());
    }

    #[test]
    fn test_export_snapshot_contents() {
        let mut player = PlayerRecord::new("p2".to_string(), now() - Duration::minutes(3));
        player.points = 640.0;
        player.character_level = 3;

        let (snapshot, info) = export_snapshot(&player, now());

        assert_eq!(snapshot.player_id, "p2");
        assert_eq!(snapshot.points, 640.0);
        assert_eq!(snapshot.game_version, "1.0");
        assert_eq!(snapshot.export_timestamp, iso_timestamp(now()));
        assert_eq!(snapshot.last_save, iso_timestamp(now()));
        assert_eq!(info.character_name, "Shugo");
        assert_eq!(info.total_progress, "640 points, Level 3");
        assert_eq!(info.export_time, "2024-02-10 18:30:00 UTC");

        player.points = 12.5;
        let (_, info) = export_snapshot(&player, now());
        assert_eq!(info.total_progress, "12.5 points, Level 3");
    }

    #[test]
    fn test_exported_blob_imports_unchanged() {
        let mut player = PlayerRecord::new("p3".to_string(), now() - Duration::hours(1));
        player.points = 98_765.0;
        player.energy = 42;
        player.character_level = 2;
        player.upgrade_level = 6;

        let (snapshot, _) = export_snapshot(&player, now());
        let value = serde_json::to_value(&snapshot).unwrap();
        let restored = import_record("p3", value.as_object().unwrap(), now()).unwrap();

        assert_eq!(restored.points, player.points);
        assert_eq!(restored.energy, player.energy);
        assert_eq!(restored.character_level, player.character_level);
        assert_eq!(restored.upgrade_level, player.upgrade_level);
        assert_eq!(restored.last_energy_update, player.last_energy_update);
    }
}
