#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };
    use uuid::Uuid;

    use oppidum_game::models::{
        alliance::Alliance, battle::Battle, market::MarketOffer, player::Player, queue::QueueEntry,
        village::Village, war::War,
    };
    use oppidum_types::errors::{ApplicationError, DbError};

    use crate::{
        clock::{Clock, SystemClock},
        config::Config,
        cqrs::HandlerContext,
        events::{DomainEvent, EventSink, NoopEventSink},
        repository::{
            AllianceRepository, BattleRepository, MarketRepository, PlayerLeaderboardEntry,
            PlayerRepository, QueueRepository, VillageRepository, WarRepository,
        },
        uow::{UnitOfWork, UnitOfWorkProvider},
    };

    #[derive(Default, Clone)]
    pub struct MockPlayerRepository {
        players: Arc<Mutex<HashMap<Uuid, Player>>>,
    }

    #[async_trait]
    impl PlayerRepository for MockPlayerRepository {
        async fn get_by_id(&self, player_id: Uuid) -> Result<Player, ApplicationError> {
            if let Some(player) = self.players.lock().unwrap().get(&player_id) {
                Ok(player.clone())
            } else {
                Err(ApplicationError::Db(DbError::PlayerNotFound(player_id)))
            }
        }

        async fn save(&self, player: &Player) -> Result<(), ApplicationError> {
            self.players
                .lock()
                .unwrap()
                .insert(player.id, player.clone());
            Ok(())
        }

        async fn list_by_alliance_id(
            &self,
            alliance_id: Uuid,
        ) -> Result<Vec<Player>, ApplicationError> {
            let players = self.players.lock().unwrap();
            Ok(players
                .values()
                .filter(|p| p.alliance_id() == Some(alliance_id))
                .cloned()
                .collect())
        }

        async fn leaderboard(
            &self,
            limit: u32,
        ) -> Result<Vec<PlayerLeaderboardEntry>, ApplicationError> {
            let players = self.players.lock().unwrap();
            let mut entries: Vec<PlayerLeaderboardEntry> = players
                .values()
                .map(|p| PlayerLeaderboardEntry {
                    player_id: p.id,
                    username: p.username.clone(),
                    alliance_id: p.alliance_id(),
                    points: p.points(),
                })
                .collect();
            entries.sort_by(|a, b| b.points.cmp(&a.points));
            entries.truncate(limit as usize);
            Ok(entries)
        }
    }

    /// In-memory village store with the same compare-and-swap rule the real
    /// repository enforces: saving a stale version fails.
    #[derive(Default, Clone)]
    pub struct MockVillageRepository {
        villages: Arc<Mutex<HashMap<Uuid, Village>>>,
    }

    #[async_trait]
    impl VillageRepository for MockVillageRepository {
        async fn get_by_id(&self, village_id: Uuid) -> Result<Village, ApplicationError> {
            let villages = self.villages.lock().unwrap();
            Ok(villages
                .get(&village_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::VillageNotFound(village_id)))?)
        }

        async fn list_by_player_id(
            &self,
            player_id: Uuid,
        ) -> Result<Vec<Village>, ApplicationError> {
            let villages = self.villages.lock().unwrap();
            Ok(villages
                .values()
                .filter(|v| v.player_id == player_id)
                .cloned()
                .collect())
        }

        async fn save(&self, village: &Village) -> Result<(), ApplicationError> {
            let mut villages = self.villages.lock().unwrap();
            if let Some(stored) = villages.get(&village.id) {
                if stored.version() != village.version() {
                    return Err(ApplicationError::Db(DbError::ConcurrentModification {
                        entity: "village",
                        id: village.id,
                    }));
                }
            }
            let mut row = village.clone();
            row.advance_version();
            villages.insert(row.id, row);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockQueueRepository {
        entries: Arc<Mutex<HashMap<Uuid, QueueEntry>>>,
    }

    #[async_trait]
    impl QueueRepository for MockQueueRepository {
        async fn add(&self, entry: &QueueEntry) -> Result<(), ApplicationError> {
            self.entries.lock().unwrap().insert(entry.id, entry.clone());
            Ok(())
        }

        async fn get_by_id(&self, entry_id: Uuid) -> Result<QueueEntry, ApplicationError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .get(&entry_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::QueueEntryNotFound(entry_id)))?)
        }

        async fn list_active_by_village(
            &self,
            village_id: Uuid,
        ) -> Result<Vec<QueueEntry>, ApplicationError> {
            let entries = self.entries.lock().unwrap();
            let mut active: Vec<QueueEntry> = entries
                .values()
                .filter(|e| e.village_id == village_id && e.status().is_active())
                .cloned()
                .collect();
            active.sort_by_key(|e| e.completes_at);
            Ok(active)
        }

        async fn list_due_by_village(
            &self,
            village_id: Uuid,
            now: DateTime<Utc>,
        ) -> Result<Vec<QueueEntry>, ApplicationError> {
            let entries = self.entries.lock().unwrap();
            let mut due: Vec<QueueEntry> = entries
                .values()
                .filter(|e| e.village_id == village_id && e.is_due(now))
                .cloned()
                .collect();
            due.sort_by_key(|e| e.completes_at);
            Ok(due)
        }

        async fn save(&self, entry: &QueueEntry) -> Result<(), ApplicationError> {
            self.entries.lock().unwrap().insert(entry.id, entry.clone());
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockMarketRepository {
        offers: Arc<Mutex<HashMap<Uuid, MarketOffer>>>,
    }

    #[async_trait]
    impl MarketRepository for MockMarketRepository {
        async fn add(&self, offer: &MarketOffer) -> Result<(), ApplicationError> {
            self.offers.lock().unwrap().insert(offer.id, offer.clone());
            Ok(())
        }

        async fn get_by_id(&self, offer_id: Uuid) -> Result<MarketOffer, ApplicationError> {
            let offers = self.offers.lock().unwrap();
            Ok(offers
                .get(&offer_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::MarketOfferNotFound(offer_id)))?)
        }

        async fn list_active(&self) -> Result<Vec<MarketOffer>, ApplicationError> {
            let offers = self.offers.lock().unwrap();
            let mut active: Vec<MarketOffer> = offers
                .values()
                .filter(|o| o.status().is_active())
                .cloned()
                .collect();
            active.sort_by_key(|o| o.created_at);
            Ok(active)
        }

        async fn list_by_player_id(
            &self,
            player_id: Uuid,
        ) -> Result<Vec<MarketOffer>, ApplicationError> {
            let offers = self.offers.lock().unwrap();
            Ok(offers
                .values()
                .filter(|o| o.player_id == player_id)
                .cloned()
                .collect())
        }

        async fn save(&self, offer: &MarketOffer) -> Result<(), ApplicationError> {
            self.offers.lock().unwrap().insert(offer.id, offer.clone());
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockBattleRepository {
        battles: Arc<Mutex<HashMap<Uuid, Battle>>>,
    }

    #[async_trait]
    impl BattleRepository for MockBattleRepository {
        async fn add(&self, battle: &Battle) -> Result<(), ApplicationError> {
            self.battles
                .lock()
                .unwrap()
                .insert(battle.id, battle.clone());
            Ok(())
        }

        async fn list_by_village_id(
            &self,
            village_id: Uuid,
        ) -> Result<Vec<Battle>, ApplicationError> {
            let battles = self.battles.lock().unwrap();
            let mut found: Vec<Battle> = battles
                .values()
                .filter(|b| {
                    b.attacker_village_id == village_id || b.defender_village_id == village_id
                })
                .cloned()
                .collect();
            found.sort_by_key(|b| std::cmp::Reverse(b.fought_at));
            Ok(found)
        }

        async fn list_by_war_id(&self, war_id: Uuid) -> Result<Vec<Battle>, ApplicationError> {
            let battles = self.battles.lock().unwrap();
            let mut found: Vec<Battle> = battles
                .values()
                .filter(|b| b.war_id == Some(war_id))
                .cloned()
                .collect();
            found.sort_by_key(|b| std::cmp::Reverse(b.fought_at));
            Ok(found)
        }
    }

    #[derive(Default, Clone)]
    pub struct MockAllianceRepository {
        alliances: Arc<Mutex<HashMap<Uuid, Alliance>>>,
    }

    #[async_trait]
    impl AllianceRepository for MockAllianceRepository {
        async fn add(&self, alliance: &Alliance) -> Result<(), ApplicationError> {
            self.alliances
                .lock()
                .unwrap()
                .insert(alliance.id, alliance.clone());
            Ok(())
        }

        async fn get_by_id(&self, alliance_id: Uuid) -> Result<Alliance, ApplicationError> {
            let alliances = self.alliances.lock().unwrap();
            Ok(alliances
                .get(&alliance_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::AllianceNotFound(alliance_id)))?)
        }

        async fn save(&self, alliance: &Alliance) -> Result<(), ApplicationError> {
            self.alliances
                .lock()
                .unwrap()
                .insert(alliance.id, alliance.clone());
            Ok(())
        }

        async fn delete(&self, alliance_id: Uuid) -> Result<(), ApplicationError> {
            self.alliances.lock().unwrap().remove(&alliance_id);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockWarRepository {
        wars: Arc<Mutex<HashMap<Uuid, War>>>,
    }

    #[async_trait]
    impl WarRepository for MockWarRepository {
        async fn add(&self, war: &War) -> Result<(), ApplicationError> {
            self.wars.lock().unwrap().insert(war.id, war.clone());
            Ok(())
        }

        async fn get_by_id(&self, war_id: Uuid) -> Result<War, ApplicationError> {
            let wars = self.wars.lock().unwrap();
            Ok(wars
                .get(&war_id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::WarNotFound(war_id)))?)
        }

        async fn save(&self, war: &War) -> Result<(), ApplicationError> {
            self.wars.lock().unwrap().insert(war.id, war.clone());
            Ok(())
        }

        async fn find_open_between(
            &self,
            a: Uuid,
            b: Uuid,
        ) -> Result<Option<War>, ApplicationError> {
            let wars = self.wars.lock().unwrap();
            Ok(wars
                .values()
                .find(|w| w.is_between(a, b) && !w.status().is_ended())
                .cloned())
        }

        async fn find_active_between(
            &self,
            a: Uuid,
            b: Uuid,
        ) -> Result<Option<War>, ApplicationError> {
            let wars = self.wars.lock().unwrap();
            Ok(wars
                .values()
                .find(|w| w.is_between(a, b) && w.status().is_active())
                .cloned())
        }

        async fn list_by_alliance_id(
            &self,
            alliance_id: Uuid,
        ) -> Result<Vec<War>, ApplicationError> {
            let wars = self.wars.lock().unwrap();
            Ok(wars
                .values()
                .filter(|w| w.involves(alliance_id))
                .cloned()
                .collect())
        }
    }

    #[derive(Default, Clone)]
    pub struct MockUnitOfWork {
        players: Arc<MockPlayerRepository>,
        villages: Arc<MockVillageRepository>,
        queues: Arc<MockQueueRepository>,
        market: Arc<MockMarketRepository>,
        battles: Arc<MockBattleRepository>,
        alliances: Arc<MockAllianceRepository>,
        wars: Arc<MockWarRepository>,

        // Flags to check if commit/rollback was called
        committed: Arc<Mutex<bool>>,
        rolled_back: Arc<Mutex<bool>>,
    }

    impl MockUnitOfWork {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn was_committed(&self) -> bool {
            *self.committed.lock().unwrap()
        }

        pub fn was_rolled_back(&self) -> bool {
            *self.rolled_back.lock().unwrap()
        }
    }

    #[async_trait]
    impl<'a> UnitOfWork<'a> for MockUnitOfWork {
        fn players(&self) -> Arc<dyn PlayerRepository + 'a> {
            self.players.clone()
        }
        fn villages(&self) -> Arc<dyn VillageRepository + 'a> {
            self.villages.clone()
        }
        fn queues(&self) -> Arc<dyn QueueRepository + 'a> {
            self.queues.clone()
        }
        fn market(&self) -> Arc<dyn MarketRepository + 'a> {
            self.market.clone()
        }
        fn battles(&self) -> Arc<dyn BattleRepository + 'a> {
            self.battles.clone()
        }
        fn alliances(&self) -> Arc<dyn AllianceRepository + 'a> {
            self.alliances.clone()
        }
        fn wars(&self) -> Arc<dyn WarRepository + 'a> {
            self.wars.clone()
        }

        async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.committed.lock().unwrap() = true;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.rolled_back.lock().unwrap() = true;
            Ok(())
        }
    }

    /// Hands out transactions that all share the same in-memory stores, so a
    /// retried command sees what the previous attempt persisted.
    #[derive(Default)]
    pub struct MockUnitOfWorkProvider {
        template: MockUnitOfWork,
    }

    impl MockUnitOfWorkProvider {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn repos(&self) -> &MockUnitOfWork {
            &self.template
        }
    }

    #[async_trait]
    impl UnitOfWorkProvider for MockUnitOfWorkProvider {
        async fn tx<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(self.template.clone());
            Ok(uow)
        }
    }

    /// A clock tests can move by hand.
    #[derive(Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        pub fn at(now: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, span: Duration) {
            *self.now.lock().unwrap() += span;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    /// Records published events for assertions.
    #[derive(Default)]
    pub struct CollectingEventSink {
        events: Arc<Mutex<Vec<DomainEvent>>>,
    }

    impl CollectingEventSink {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn events(&self) -> Vec<DomainEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventSink for CollectingEventSink {
        fn publish(&self, event: DomainEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    pub fn handler_context() -> HandlerContext {
        HandlerContext {
            config: Arc::new(Config::from_env()),
            clock: Arc::new(SystemClock::new()),
            events: Arc::new(NoopEventSink::new()),
        }
    }

    pub fn handler_context_with_clock(clock: ManualClock) -> HandlerContext {
        HandlerContext {
            config: Arc::new(Config::from_env()),
            clock: Arc::new(clock),
            events: Arc::new(NoopEventSink::new()),
        }
    }
}
