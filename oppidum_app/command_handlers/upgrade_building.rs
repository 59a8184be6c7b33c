use tracing::{info, instrument};

use oppidum_game::models::queue::QueueEntry;
use oppidum_types::{
    errors::{ApplicationError, GameError},
    queue::QueueTask,
};

use crate::{
    completion::settle_due_entries,
    cqrs::{CommandHandler, HandlerContext, commands::UpgradeBuilding},
    uow::UnitOfWork,
};

pub struct UpgradeBuildingCommandHandler {}

impl Default for UpgradeBuildingCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeBuildingCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<UpgradeBuilding> for UpgradeBuildingCommandHandler {
    #[instrument(skip_all, fields(
        village_id = %command.village_id,
        slot_id = command.slot_id,
    ))]
    async fn handle(
        &self,
        command: UpgradeBuilding,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<QueueEntry, ApplicationError> {
        let village_repo = uow.villages();
        let queue_repo = uow.queues();
        let now = ctx.clock.now();

        let mut village = village_repo.get_by_id(command.village_id).await?;
        if village.player_id != command.player_id {
            return Err(GameError::VillageNotOwned {
                village_id: command.village_id,
                player_id: command.player_id,
            }
            .into());
        }

        settle_due_entries(uow, &mut village, now, ctx).await?;

        let (to_level, cost, duration_secs) =
            village.init_building_upgrade(command.slot_id, &ctx.config.game)?;

        let entry = QueueEntry::new(
            command.village_id,
            QueueTask::UpgradeBuilding {
                slot_id: command.slot_id,
                to_level,
            },
            cost,
            now,
            duration_secs,
        );

        village_repo.save(&village).await?;
        queue_repo.add(&entry).await?;

        info!(
            entry_id = %entry.id,
            completes_at = %entry.completes_at,
            "Building upgrade queued"
        );

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use uuid::Uuid;

    use oppidum_game::test_utils::{VillageFactoryOptions, village_factory};
    use oppidum_types::{
        buildings::BuildingKind,
        common::ResourceBundle,
        errors::Result,
        queue::QueueStatus,
    };

    use super::*;
    use crate::test_utils::tests::{ManualClock, MockUnitOfWork, handler_context};

    #[tokio::test]
    async fn test_upgrade_building_handler_success() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let now = chrono::Utc::now();
        let clock = Arc::new(ManualClock::at(now));
        let mut ctx = handler_context();
        ctx.clock = clock;

        let village = village_factory(VillageFactoryOptions {
            balance: Some(ResourceBundle::new(2000, 2000, 2000, 2000)),
            updated_at: Some(now),
            ..Default::default()
        });
        let village_id = village.id;
        let player_id = village.player_id;
        mock_uow.villages().save(&village).await?;

        let handler = UpgradeBuildingCommandHandler::new();
        let command = UpgradeBuilding {
            player_id,
            village_id,
            slot_id: 1,
        };

        let entry = handler.handle(command, &mock_uow, &ctx).await?;

        let expected_cost = ctx.config.game.upgrade_cost(BuildingKind::Woodcutter, 1);
        assert_eq!(entry.cost(), &expected_cost);
        assert_eq!(entry.status(), QueueStatus::Active);
        assert_eq!(entry.started_at, now);
        assert_eq!(
            entry.completes_at,
            now + Duration::seconds(
                ctx.config.game.upgrade_secs(BuildingKind::Woodcutter, 1) as i64
            ),
        );

        let saved = mock_uow.villages().get_by_id(village_id).await?;
        assert_eq!(
            saved.balance().wood,
            2000 - expected_cost.wood,
            "cost withdrawn from stocks"
        );
        assert!(saved.building(1).unwrap().upgrading, "slot marked busy");

        let active = mock_uow.queues().list_active_by_village(village_id).await?;
        assert_eq!(active.len(), 1, "one entry queued");
        Ok(())
    }

    #[tokio::test]
    async fn test_upgrade_building_handler_rejects_foreign_village() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let village = village_factory(Default::default());
        mock_uow.villages().save(&village).await?;

        let intruder = Uuid::new_v4();
        let handler = UpgradeBuildingCommandHandler::new();
        let command = UpgradeBuilding {
            player_id: intruder,
            village_id: village.id,
            slot_id: 1,
        };

        let result = handler.handle(command, &mock_uow, &ctx).await;
        assert!(result.is_err(), "Expected handler to fail");
        assert_eq!(
            result.err().unwrap().to_string(),
            GameError::VillageNotOwned {
                village_id: village.id,
                player_id: intruder,
            }
            .to_string()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_upgrade_building_handler_not_enough_resources() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let village = village_factory(VillageFactoryOptions {
            balance: Some(ResourceBundle::ZERO),
            ..Default::default()
        });
        mock_uow.villages().save(&village).await?;

        let handler = UpgradeBuildingCommandHandler::new();
        let command = UpgradeBuilding {
            player_id: village.player_id,
            village_id: village.id,
            slot_id: 1,
        };

        let result = handler.handle(command, &mock_uow, &ctx).await;
        assert!(result.is_err(), "Expected handler to fail");
        assert_eq!(
            result.err().unwrap().to_string(),
            GameError::InsufficientResources.to_string()
        );

        let entries = mock_uow.queues().list_active_by_village(village.id).await?;
        assert_eq!(entries.len(), 0, "No entries should be queued");
        Ok(())
    }

    #[tokio::test]
    async fn test_upgrade_building_handler_rejects_busy_slot() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let village = village_factory(VillageFactoryOptions {
            balance: Some(ResourceBundle::new(9000, 9000, 9000, 9000)),
            ..Default::default()
        });
        mock_uow.villages().save(&village).await?;

        let handler = UpgradeBuildingCommandHandler::new();
        let command = UpgradeBuilding {
            player_id: village.player_id,
            village_id: village.id,
            slot_id: 3,
        };

        handler.handle(command.clone(), &mock_uow, &ctx).await?;
        let again = handler.handle(command, &mock_uow, &ctx).await;

        assert!(again.is_err(), "Expected a second upgrade to fail");
        assert_eq!(
            again.err().unwrap().to_string(),
            GameError::UpgradeInProgress { slot_id: 3 }.to_string()
        );
        Ok(())
    }
}
