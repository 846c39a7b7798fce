use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PlayerStore;
use crate::error::StoreError;
use crate::types::PlayerRecord;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<String, PlayerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn get(&self, player_id: &str) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.players.read().await.get(player_id).cloned())
    }

    async fn put(&self, player: &PlayerRecord) -> Result<(), StoreError> {
        let mut players = self.players.write().await;
        players.insert(player.player_id.clone(), player.clone());
        Ok(())
    }
}
