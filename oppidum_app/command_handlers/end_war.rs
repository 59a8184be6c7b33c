use tracing::{info, instrument};

use oppidum_types::errors::{ApplicationError, GameError};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::EndWar},
    uow::UnitOfWork,
};

pub struct EndWarCommandHandler {}

impl Default for EndWarCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EndWarCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<EndWar> for EndWarCommandHandler {
    #[instrument(skip_all, fields(war_id = %command.war_id, player_id = %command.player_id))]
    async fn handle(
        &self,
        command: EndWar,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let war_repo = uow.wars();
        let now = ctx.clock.now();

        let mut war = war_repo.get_by_id(command.war_id).await?;
        let player = uow.players().get_by_id(command.player_id).await?;

        // either side may end it: the defender by refusing a proposal,
        // both by calling a running war off
        let is_participant = player
            .alliance_id()
            .is_some_and(|alliance_id| war.involves(alliance_id));
        if !is_participant {
            return Err(GameError::WarParticipantMismatch {
                war_id: command.war_id,
            }
            .into());
        }

        war.end(now)?;
        war_repo.save(&war).await?;

        info!(war_id = %war.id, "War ended");
        Ok(())
    }
}
