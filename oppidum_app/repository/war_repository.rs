use uuid::Uuid;

use oppidum_game::models::war::War;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait WarRepository: Send + Sync {
    async fn add(&self, war: &War) -> Result<(), ApplicationError>;
    async fn get_by_id(&self, war_id: Uuid) -> Result<War, ApplicationError>;
    async fn save(&self, war: &War) -> Result<(), ApplicationError>;

    /// The proposed or active war between two alliances, if any. At most
    /// one such war exists per pair, in either direction.
    async fn find_open_between(&self, a: Uuid, b: Uuid) -> Result<Option<War>, ApplicationError>;

    /// The active war between two alliances, if any.
    async fn find_active_between(&self, a: Uuid, b: Uuid)
    -> Result<Option<War>, ApplicationError>;

    /// Wars an alliance is or was part of, on either side.
    async fn list_by_alliance_id(&self, alliance_id: Uuid) -> Result<Vec<War>, ApplicationError>;
}
