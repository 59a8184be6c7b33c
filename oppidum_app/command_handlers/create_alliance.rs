use tracing::{info, instrument};

use oppidum_game::models::alliance::Alliance;
use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::CreateAlliance},
    uow::UnitOfWork,
};

pub struct CreateAllianceCommandHandler {}

impl Default for CreateAllianceCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateAllianceCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<CreateAlliance> for CreateAllianceCommandHandler {
    #[instrument(skip_all, fields(player_id = %command.player_id, tag = %command.tag))]
    async fn handle(
        &self,
        command: CreateAlliance,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<Alliance, ApplicationError> {
        let player_repo = uow.players();
        let alliance_repo = uow.alliances();

        let mut player = player_repo.get_by_id(command.player_id).await?;

        let mut alliance = Alliance::new(command.name, command.tag);
        // the founder joins on the spot; a member of another alliance
        // cannot found a second one
        player.join_alliance(alliance.id)?;
        alliance.add_member_points(player.points());

        alliance_repo.add(&alliance).await?;
        player_repo.save(&player).await?;

        info!(alliance_id = %alliance.id, "Alliance founded");
        Ok(alliance)
    }
}
