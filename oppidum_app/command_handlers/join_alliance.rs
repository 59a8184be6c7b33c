use tracing::{info, instrument};

use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::JoinAlliance},
    uow::UnitOfWork,
};

pub struct JoinAllianceCommandHandler {}

impl Default for JoinAllianceCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinAllianceCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<JoinAlliance> for JoinAllianceCommandHandler {
    #[instrument(skip_all, fields(
        player_id = %command.player_id,
        alliance_id = %command.alliance_id,
    ))]
    async fn handle(
        &self,
        command: JoinAlliance,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let player_repo = uow.players();
        let alliance_repo = uow.alliances();

        // joining a deleted alliance must fail, not dangle
        let mut alliance = alliance_repo.get_by_id(command.alliance_id).await?;

        let mut player = player_repo.get_by_id(command.player_id).await?;
        player.join_alliance(alliance.id)?;
        alliance.add_member_points(player.points());

        player_repo.save(&player).await?;
        alliance_repo.save(&alliance).await?;

        info!("Player joined alliance");
        Ok(())
    }
}
