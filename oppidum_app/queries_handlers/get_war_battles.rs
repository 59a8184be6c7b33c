use async_trait::async_trait;

use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{HandlerContext, Query, QueryHandler, queries::GetWarBattles},
    uow::UnitOfWork,
};

pub struct GetWarBattlesHandler {}

impl GetWarBattlesHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetWarBattles> for GetWarBattlesHandler {
    async fn handle(
        &self,
        query: GetWarBattles,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<<GetWarBattles as Query>::Output, ApplicationError> {
        // asking for an unknown war is an error, an uneventful war is not
        uow.wars().get_by_id(query.war_id).await?;

        uow.battles().list_by_war_id(query.war_id).await
    }
}

#[cfg(test)]
mod tests {
    use oppidum_game::test_utils::{WarFactoryOptions, war_factory};
    use oppidum_types::errors::Result;
    use uuid::Uuid;

    use super::*;
    use crate::test_utils::tests::{MockUnitOfWork, handler_context};

    #[tokio::test]
    async fn test_get_war_battles_handler_with_uneventful_war() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let war = war_factory(WarFactoryOptions {
            accepted: Some(true),
            ..Default::default()
        });
        mock_uow.wars().add(&war).await?;

        let battles = GetWarBattlesHandler::new()
            .handle(GetWarBattles { war_id: war.id }, &mock_uow, &ctx)
            .await?;

        assert!(battles.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_war_battles_handler_rejects_unknown_war() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let result = GetWarBattlesHandler::new()
            .handle(
                GetWarBattles {
                    war_id: Uuid::new_v4(),
                },
                &mock_uow,
                &ctx,
            )
            .await;

        assert!(result.is_err(), "Expected handler to fail");
        Ok(())
    }
}
