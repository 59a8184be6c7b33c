use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use oppidum_game::models::village::Village;
use oppidum_types::{errors::ApplicationError, queue::QueueTask};

use crate::{cqrs::HandlerContext, events::DomainEvent, uow::UnitOfWork};

/// Applies every due queue entry of a village, oldest deadline first.
///
/// There is no background worker: whichever operation touches a village
/// next pays off its backlog. Stocks are accrued up to each deadline at the
/// rates valid before the entry lands, so late settlement produces the same
/// balances as punctual settlement would have.
///
/// Settled entries are persisted here; the caller saves the village itself
/// together with its own changes.
#[instrument(skip_all, fields(village_id = %village.id))]
pub async fn settle_due_entries(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    village: &mut Village,
    now: DateTime<Utc>,
    ctx: &HandlerContext,
) -> Result<(), ApplicationError> {
    let queue_repo = uow.queues();
    let due = queue_repo.list_due_by_village(village.id, now).await?;

    for mut entry in due {
        village.sync(entry.completes_at);

        match entry.task {
            QueueTask::UpgradeBuilding { slot_id, to_level } => {
                village.apply_building_upgrade(slot_id, to_level, &ctx.config.game)?;
                ctx.events.publish(DomainEvent::BuildingCompleted {
                    village_id: village.id,
                    slot_id,
                    level: to_level,
                });
            }
            QueueTask::TrainUnits { unit, quantity } => {
                village.apply_unit_training(unit, quantity, &ctx.config.game);
                ctx.events.publish(DomainEvent::TrainingCompleted {
                    village_id: village.id,
                    unit,
                    quantity,
                });
            }
        }

        entry.complete()?;
        queue_repo.save(&entry).await?;
        info!(entry_id = %entry.id, task = entry.task.label(), "Settled due queue entry");
    }

    village.sync(now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use oppidum_game::{
        models::queue::QueueEntry,
        test_utils::{VillageFactoryOptions, village_factory},
    };
    use oppidum_types::{
        army::UnitKind,
        common::ResourceBundle,
        errors::Result,
        queue::{QueueStatus, QueueTask},
    };

    use super::*;
    use crate::{
        test_utils::tests::{CollectingEventSink, MockUnitOfWork, handler_context},
        uow::UnitOfWork,
    };

    #[tokio::test]
    async fn test_settle_applies_due_upgrade_with_boundary_accrual() -> Result<()> {
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();
        let started = Utc::now() - Duration::hours(2);

        let mut village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            balance: Some(ResourceBundle::ZERO),
            ..Default::default()
        });

        // woodcutter on slot 1 finishes after 10 minutes
        let entry = QueueEntry::new(
            village.id,
            QueueTask::UpgradeBuilding {
                slot_id: 1,
                to_level: 1,
            },
            ResourceBundle::new(40, 100, 50, 60),
            started,
            600,
        );
        uow.queues().add(&entry).await?;

        let now = started + Duration::seconds(600) + Duration::hours(1);
        settle_due_entries(&uow, &mut village, now, &ctx).await?;

        assert_eq!(village.building(1).unwrap().level, 1);
        assert_eq!(
            village.balance().wood,
            ctx.config.game.production_per_level,
            "one hour of level-1 output, none before the upgrade landed"
        );

        let settled = uow.queues().get_by_id(entry.id).await?;
        assert_eq!(settled.status(), QueueStatus::Completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_takes_entries_in_deadline_order() -> Result<()> {
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();
        let started = Utc::now() - Duration::hours(3);

        let mut village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            ..Default::default()
        });

        let training = QueueEntry::new(
            village.id,
            QueueTask::TrainUnits {
                unit: UnitKind::Spearman,
                quantity: 3,
            },
            ResourceBundle::ZERO,
            started,
            1800,
        );
        let upgrade = QueueEntry::new(
            village.id,
            QueueTask::UpgradeBuilding {
                slot_id: 5,
                to_level: 1,
            },
            ResourceBundle::ZERO,
            started,
            300,
        );
        let pending = QueueEntry::new(
            village.id,
            QueueTask::UpgradeBuilding {
                slot_id: 9,
                to_level: 1,
            },
            ResourceBundle::ZERO,
            started,
            7 * 3600,
        );
        uow.queues().add(&training).await?;
        uow.queues().add(&upgrade).await?;
        uow.queues().add(&pending).await?;

        settle_due_entries(&uow, &mut village, Utc::now(), &ctx).await?;

        assert_eq!(village.building(5).unwrap().level, 1);
        assert_eq!(village.army().unit_amount(UnitKind::Spearman), 3);
        assert_eq!(
            village.building(9).unwrap().level,
            0,
            "future entry untouched"
        );

        let active = uow.queues().list_active_by_village(village.id).await?;
        assert_eq!(active.len(), 1, "only the future entry stays active");
        assert_eq!(active[0].id, pending.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_publishes_completion_events() -> Result<()> {
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let sink = Arc::new(CollectingEventSink::new());
        let mut ctx = handler_context();
        ctx.events = sink.clone();

        let started = Utc::now() - Duration::hours(1);
        let mut village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            ..Default::default()
        });

        let entry = QueueEntry::new(
            village.id,
            QueueTask::TrainUnits {
                unit: UnitKind::Archer,
                quantity: 5,
            },
            ResourceBundle::ZERO,
            started,
            60,
        );
        uow.queues().add(&entry).await?;

        settle_due_entries(&uow, &mut village, Utc::now(), &ctx).await?;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            DomainEvent::TrainingCompleted {
                village_id: village.id,
                unit: UnitKind::Archer,
                quantity: 5,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_without_due_entries_only_syncs() -> Result<()> {
        let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();
        let started = Utc::now() - Duration::hours(1);

        let mut village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            balance: Some(ResourceBundle::new(0, 0, 0, 1000)),
            ..Default::default()
        });
        let upkeep = village.production.upkeep;

        let now = Utc::now();
        settle_due_entries(&uow, &mut village, now, &ctx).await?;

        assert_eq!(village.balance().crop, 1000 - upkeep, "an hour of upkeep");
        assert_eq!(village.updated_at, now);
        Ok(())
    }
}
