pub mod get_leaderboard;
pub mod get_village_by_id;
pub mod get_village_queues;
pub mod get_war_battles;
pub mod list_market_offers;
