use async_trait::async_trait;

use oppidum_types::errors::ApplicationError;

use crate::{
    completion::settle_due_entries,
    cqrs::{HandlerContext, Query, QueryHandler, queries::GetVillageQueues},
    uow::UnitOfWork,
};

pub struct GetVillageQueuesHandler {}

impl GetVillageQueuesHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetVillageQueues> for GetVillageQueuesHandler {
    async fn handle(
        &self,
        query: GetVillageQueues,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<<GetVillageQueues as Query>::Output, ApplicationError> {
        let mut village = uow.villages().get_by_id(query.village_id).await?;

        // Entries past their deadline are logically finished, not pending.
        // Settling first keeps them out of the listing.
        settle_due_entries(uow, &mut village, ctx.clock.now(), ctx).await?;

        uow.queues().list_active_by_village(query.village_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use oppidum_game::{
        models::queue::QueueEntry,
        test_utils::{VillageFactoryOptions, village_factory},
    };
    use oppidum_types::{
        common::ResourceBundle,
        errors::Result,
        queue::QueueTask,
    };

    use super::*;
    use crate::test_utils::tests::{MockUnitOfWork, handler_context};

    #[tokio::test]
    async fn test_get_village_queues_handler_lists_only_pending_entries() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();
        let started = Utc::now() - Duration::minutes(30);

        let village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            ..Default::default()
        });
        let done = QueueEntry::new(
            village.id,
            QueueTask::UpgradeBuilding {
                slot_id: 1,
                to_level: 1,
            },
            ResourceBundle::ZERO,
            started,
            600,
        );
        let pending = QueueEntry::new(
            village.id,
            QueueTask::UpgradeBuilding {
                slot_id: 2,
                to_level: 1,
            },
            ResourceBundle::ZERO,
            started,
            4 * 3600,
        );
        mock_uow.villages().save(&village).await?;
        mock_uow.queues().add(&done).await?;
        mock_uow.queues().add(&pending).await?;

        let entries = GetVillageQueuesHandler::new()
            .handle(
                GetVillageQueues {
                    village_id: village.id,
                },
                &mock_uow,
                &ctx,
            )
            .await?;

        assert_eq!(entries.len(), 1, "the due entry is finished, not pending");
        assert_eq!(entries[0].id, pending.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_village_queues_handler_with_empty_queue() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let village = village_factory(VillageFactoryOptions::default());
        mock_uow.villages().save(&village).await?;

        let entries = GetVillageQueuesHandler::new()
            .handle(
                GetVillageQueues {
                    village_id: village.id,
                },
                &mock_uow,
                &ctx,
            )
            .await?;

        assert!(entries.is_empty());
        Ok(())
    }
}
