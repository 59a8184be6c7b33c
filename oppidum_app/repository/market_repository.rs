use uuid::Uuid;

use oppidum_game::models::market::MarketOffer;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait MarketRepository: Send + Sync {
    async fn add(&self, offer: &MarketOffer) -> Result<(), ApplicationError>;
    async fn get_by_id(&self, offer_id: Uuid) -> Result<MarketOffer, ApplicationError>;
    async fn list_active(&self) -> Result<Vec<MarketOffer>, ApplicationError>;
    async fn list_by_player_id(&self, player_id: Uuid)
    -> Result<Vec<MarketOffer>, ApplicationError>;
    async fn save(&self, offer: &MarketOffer) -> Result<(), ApplicationError>;
}
