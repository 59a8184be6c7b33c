mod alliance_repository;
mod battle_repository;
mod market_repository;
mod player_repository;
mod queue_repository;
mod village_repository;
mod war_repository;

pub use alliance_repository::AllianceRepository;
pub use battle_repository::BattleRepository;
pub use market_repository::MarketRepository;
pub use player_repository::{PlayerLeaderboardEntry, PlayerRepository};
pub use queue_repository::QueueRepository;
pub use village_repository::VillageRepository;
pub use war_repository::WarRepository;
