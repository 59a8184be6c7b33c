use uuid::Uuid;

use oppidum_game::models::{battle::Battle, market::MarketOffer, queue::QueueEntry, village::Village};

use crate::cqrs::Query;
use crate::repository::PlayerLeaderboardEntry;

/// Fetch a village with its stocks caught up to the present and any due
/// queue work applied.
pub struct GetVillageById {
    pub id: Uuid,
}

impl Query for GetVillageById {
    type Output = Village;
}

/// Fetch the still-active queue entries of a village.
pub struct GetVillageQueues {
    pub village_id: Uuid,
}

impl Query for GetVillageQueues {
    type Output = Vec<QueueEntry>;
}

/// Fetch every offer currently open on the market.
pub struct ListMarketOffers {}

impl Query for ListMarketOffers {
    type Output = Vec<MarketOffer>;
}

/// Fetch the battles fought under a war, newest first.
pub struct GetWarBattles {
    pub war_id: Uuid,
}

impl Query for GetWarBattles {
    type Output = Vec<Battle>;
}

/// Fetch the player ranking, best first.
pub struct GetLeaderboard {
    pub limit: u32,
}

impl Query for GetLeaderboard {
    type Output = Vec<PlayerLeaderboardEntry>;
}
