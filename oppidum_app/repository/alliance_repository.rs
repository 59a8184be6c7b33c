use uuid::Uuid;

use oppidum_game::models::alliance::Alliance;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait AllianceRepository: Send + Sync {
    async fn add(&self, alliance: &Alliance) -> Result<(), ApplicationError>;
    async fn get_by_id(&self, alliance_id: Uuid) -> Result<Alliance, ApplicationError>;
    async fn save(&self, alliance: &Alliance) -> Result<(), ApplicationError>;
    async fn delete(&self, alliance_id: Uuid) -> Result<(), ApplicationError>;
}
