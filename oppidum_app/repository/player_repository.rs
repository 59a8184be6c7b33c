use uuid::Uuid;

use oppidum_game::models::player::Player;
use oppidum_types::errors::ApplicationError;

/// A row of the player ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLeaderboardEntry {
    pub player_id: Uuid,
    pub username: String,
    pub alliance_id: Option<Uuid>,
    pub points: u64,
}

#[async_trait::async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn get_by_id(&self, player_id: Uuid) -> Result<Player, ApplicationError>;
    async fn save(&self, player: &Player) -> Result<(), ApplicationError>;

    async fn list_by_alliance_id(
        &self,
        alliance_id: Uuid,
    ) -> Result<Vec<Player>, ApplicationError>;

    /// Top players by points, best first.
    async fn leaderboard(
        &self,
        limit: u32,
    ) -> Result<Vec<PlayerLeaderboardEntry>, ApplicationError>;
}
