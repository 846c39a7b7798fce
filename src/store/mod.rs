// dojo-clicker/src/store/mod.rs
// Player persistence. One document per player, whole-record upserts.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::PlayerRecord;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn get(&self, player_id: &str) -> Result<Option<PlayerRecord>, StoreError>;

    /// Inserts or fully replaces the record keyed by `player.player_id`.
    async fn put(&self, player: &PlayerRecord) -> Result<(), StoreError>;
}
