use tracing::{info, instrument};

use oppidum_game::models::war::War;
use oppidum_types::errors::{ApplicationError, GameError};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::DeclareWar},
    uow::UnitOfWork,
};

pub struct DeclareWarCommandHandler {}

impl Default for DeclareWarCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclareWarCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<DeclareWar> for DeclareWarCommandHandler {
    #[instrument(skip_all, fields(
        attacker_alliance_id = %command.attacker_alliance_id,
        defender_alliance_id = %command.defender_alliance_id,
    ))]
    async fn handle(
        &self,
        command: DeclareWar,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<War, ApplicationError> {
        let war_repo = uow.wars();
        let now = ctx.clock.now();

        let player = uow.players().get_by_id(command.player_id).await?;
        if player.alliance_id() != Some(command.attacker_alliance_id) {
            return Err(GameError::NotAllianceMember {
                player_id: command.player_id,
                alliance_id: command.attacker_alliance_id,
            }
            .into());
        }

        // the target must exist as a living alliance
        uow.alliances()
            .get_by_id(command.defender_alliance_id)
            .await?;

        let open = war_repo
            .find_open_between(command.attacker_alliance_id, command.defender_alliance_id)
            .await?;
        if open.is_some() {
            return Err(GameError::WarAlreadyExists.into());
        }

        let war = War::new(
            command.attacker_alliance_id,
            command.defender_alliance_id,
            now,
        )?;
        war_repo.add(&war).await?;

        info!(war_id = %war.id, "War declared");
        Ok(war)
    }
}
