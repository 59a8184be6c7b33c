use uuid::Uuid;

use oppidum_game::models::battle::Battle;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait BattleRepository: Send + Sync {
    async fn add(&self, battle: &Battle) -> Result<(), ApplicationError>;

    /// Battles a village took part in, on either side, newest first.
    async fn list_by_village_id(&self, village_id: Uuid)
    -> Result<Vec<Battle>, ApplicationError>;

    /// Battles credited to a war, newest first.
    async fn list_by_war_id(&self, war_id: Uuid) -> Result<Vec<Battle>, ApplicationError>;
}
