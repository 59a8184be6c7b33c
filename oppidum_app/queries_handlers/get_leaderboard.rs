use async_trait::async_trait;

use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{HandlerContext, Query, QueryHandler, queries::GetLeaderboard},
    uow::UnitOfWork,
};

pub struct GetLeaderboardHandler {}

impl GetLeaderboardHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetLeaderboard> for GetLeaderboardHandler {
    async fn handle(
        &self,
        query: GetLeaderboard,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<<GetLeaderboard as Query>::Output, ApplicationError> {
        // Clamp to sensible bounds; zero would be pointless and an
        // arbitrarily large limit would scan the whole player table.
        let limit = query.limit.clamp(1, 100);

        uow.players().leaderboard(limit).await
    }
}

#[cfg(test)]
mod tests {
    use oppidum_game::test_utils::{PlayerFactoryOptions, player_factory};
    use oppidum_types::errors::Result;

    use super::*;
    use crate::test_utils::tests::{MockUnitOfWork, handler_context};

    #[tokio::test]
    async fn test_get_leaderboard_handler_ranks_by_points() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        for (username, points) in [("bronze", 10), ("gold", 500), ("silver", 80)] {
            let player = player_factory(PlayerFactoryOptions {
                username: Some(username),
                points: Some(points),
                ..Default::default()
            });
            mock_uow.players().save(&player).await?;
        }

        let entries = GetLeaderboardHandler::new()
            .handle(GetLeaderboard { limit: 2 }, &mock_uow, &ctx)
            .await?;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "gold");
        assert_eq!(entries[1].username, "silver");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_leaderboard_handler_clamps_a_zero_limit() -> Result<()> {
        let mock_uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork::new());
        let ctx = handler_context();

        let player = player_factory(PlayerFactoryOptions {
            points: Some(42),
            ..Default::default()
        });
        mock_uow.players().save(&player).await?;

        let entries = GetLeaderboardHandler::new()
            .handle(GetLeaderboard { limit: 0 }, &mock_uow, &ctx)
            .await?;

        assert_eq!(entries.len(), 1, "a zero limit still returns the top row");
        Ok(())
    }
}
