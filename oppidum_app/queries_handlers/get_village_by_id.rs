use async_trait::async_trait;

use oppidum_types::errors::ApplicationError;

use crate::{
    completion::settle_due_entries,
    cqrs::{HandlerContext, Query, QueryHandler, queries::GetVillageById},
    uow::UnitOfWork,
};

pub struct GetVillageByIdHandler {}

impl GetVillageByIdHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetVillageById> for GetVillageByIdHandler {
    async fn handle(
        &self,
        query: GetVillageById,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<<GetVillageById as Query>::Output, ApplicationError> {
        let mut village = uow.villages().get_by_id(query.id).await?;

        // The projection shows everything already due as applied. The bus
        // rolls the transaction back afterwards; settlement is deterministic,
        // so the next command persists exactly the state reported here.
        settle_due_entries(uow, &mut village, ctx.clock.now(), ctx).await?;

        Ok(village)
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
        army::UnitKind,
        common::ResourceBundle,
        errors::Result,
        queue::QueueTask,
    };
    use uuid::Uuid;

    use super::*;
    use crate::test_utils::tests::{MockUnitOfWork, handler_context};

    #[tokio::test]
    async fn test_get_village_by_id_handler_projects_due_work() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();
        let started = Utc::now() - Duration::hours(1);

        let village = village_factory(VillageFactoryOptions {
            updated_at: Some(started),
            balance: Some(ResourceBundle::ZERO),
            ..Default::default()
        });
        let batch = QueueEntry::new(
            village.id,
            QueueTask::TrainUnits {
                unit: UnitKind::Spearman,
                quantity: 4,
            },
            ResourceBundle::ZERO,
            started,
            60,
        );
        mock_uow.villages().save(&village).await?;
        mock_uow.queues().add(&batch).await?;

        let projected = GetVillageByIdHandler::new()
            .handle(GetVillageById { id: village.id }, &mock_uow, &ctx)
            .await?;

        assert_eq!(projected.army().unit_amount(UnitKind::Spearman), 4);

        // the read itself writes no village row
        let stored = mock_uow.villages().get_by_id(village.id).await?;
        assert_eq!(stored.army().unit_amount(UnitKind::Spearman), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_village_by_id_handler_rejects_unknown_village() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let result = GetVillageByIdHandler::new()
            .handle(GetVillageById { id: Uuid::new_v4() }, &mock_uow, &ctx)
            .await;

        assert!(result.is_err(), "Expected handler to fail");
        Ok(())
    }
}
