use tracing::{info, instrument};

use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::LeaveAlliance},
    uow::UnitOfWork,
};

pub struct LeaveAllianceCommandHandler {}

impl Default for LeaveAllianceCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaveAllianceCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<LeaveAlliance> for LeaveAllianceCommandHandler {
    #[instrument(skip_all, fields(player_id = %command.player_id))]
    async fn handle(
        &self,
        command: LeaveAlliance,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let player_repo = uow.players();
        let alliance_repo = uow.alliances();

        let mut player = player_repo.get_by_id(command.player_id).await?;
        let alliance_id = player.leave_alliance()?;

        let mut alliance = alliance_repo.get_by_id(alliance_id).await?;
        alliance.remove_member_points(player.points());

        player_repo.save(&player).await?;
        alliance_repo.save(&alliance).await?;

        info!(alliance_id = %alliance_id, "Player left alliance");
        Ok(())
    }
}
