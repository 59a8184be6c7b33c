use uuid::Uuid;

use oppidum_game::models::village::Village;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait VillageRepository: Send + Sync {
    async fn get_by_id(&self, village_id: Uuid) -> Result<Village, ApplicationError>;
    async fn list_by_player_id(&self, player_id: Uuid) -> Result<Vec<Village>, ApplicationError>;

    /// Persists the village, comparing its version against the stored row.
    /// Fails with `DbError::ConcurrentModification` when another writer got
    /// there first; the bus retries the whole command in that case.
    async fn save(&self, village: &Village) -> Result<(), ApplicationError>;
}
