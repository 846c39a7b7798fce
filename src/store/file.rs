use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use super::PlayerStore;
use crate::error::StoreError;
use crate::types::PlayerRecord;

/// Stores each player as a JSON document under `data_dir`.
///
/// File names are the hex-encoded player id, so any id string is safe on disk.
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        info!("📂 Player store at {:?}", data_dir);
        Ok(Self { data_dir })
    }

    fn document_path(&self, player_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", hex::encode(player_id.as_bytes())))
    }
}

#[async_trait]
impl PlayerStore for JsonFileStore {
    async fn get(&self, player_id: &str) -> Result<Option<PlayerRecord>, StoreError> {
        let path = self.document_path(player_id);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let player = serde_json::from_slice(&raw)?;
        Ok(Some(player))
    }

    async fn put(&self, player: &PlayerRecord) -> Result<(), StoreError> {
        let path = self.document_path(&player.player_id);
        let tmp_path = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(player)?;
        fs::write(&tmp_path, body).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!("Saved player {} to {:?}", player.player_id, path);
        Ok(())
    }
}
