use tracing::{info, instrument};

use oppidum_types::errors::{ApplicationError, GameError};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::AcceptWar},
    uow::UnitOfWork,
};

pub struct AcceptWarCommandHandler {}

impl Default for AcceptWarCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceptWarCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<AcceptWar> for AcceptWarCommandHandler {
    #[instrument(skip_all, fields(war_id = %command.war_id, player_id = %command.player_id))]
    async fn handle(
        &self,
        command: AcceptWar,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let war_repo = uow.wars();
        let now = ctx.clock.now();

        let mut war = war_repo.get_by_id(command.war_id).await?;
        let player = uow.players().get_by_id(command.player_id).await?;

        // only the side the war was declared against can accept it
        if player.alliance_id() != Some(war.defender_alliance_id) {
            return Err(GameError::WarParticipantMismatch {
                war_id: command.war_id,
            }
            .into());
        }

        war.accept(now)?;
        war_repo.save(&war).await?;

        info!(war_id = %war.id, "War accepted, hostilities open");
        Ok(())
    }
}
