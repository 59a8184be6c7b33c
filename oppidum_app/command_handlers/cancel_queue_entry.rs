use tracing::{info, instrument};

use oppidum_types::{
    common::ResourceBundle,
    errors::{ApplicationError, GameError},
    queue::QueueTask,
};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::CancelQueueEntry},
    uow::UnitOfWork,
};

pub struct CancelQueueEntryCommandHandler {}

impl Default for CancelQueueEntryCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelQueueEntryCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

/// Cancels an active queue entry and refunds part of its cost.
///
/// The entry is *not* settled first: an entry whose deadline already
/// passed but which nobody touched yet can still be cancelled, at the
/// refund floor.
#[async_trait::async_trait]
impl CommandHandler<CancelQueueEntry> for CancelQueueEntryCommandHandler {
    #[instrument(skip_all, fields(
        village_id = %command.village_id,
        entry_id = %command.entry_id,
    ))]
    async fn handle(
        &self,
        command: CancelQueueEntry,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<ResourceBundle, ApplicationError> {
        let village_repo = uow.villages();
        let queue_repo = uow.queues();
        let now = ctx.clock.now();

        let mut village = village_repo.get_by_id(command.village_id).await?;
        if village.player_id != command.player_id {
            return Err(GameError::VillageNotOwned {
                village_id: command.village_id,
                player_id: command.player_id,
            }
            .into());
        }

        let mut entry = queue_repo.get_by_id(command.entry_id).await?;
        if entry.village_id != command.village_id {
            return Err(GameError::QueueEntryNotOwned {
                entry_id: command.entry_id,
                village_id: command.village_id,
            }
            .into());
        }

        let refund = entry.cancel(now)?;

        if let QueueTask::UpgradeBuilding { slot_id, .. } = entry.task {
            village.cancel_building_upgrade(slot_id)?;
        }
        village.credit(&refund);

        queue_repo.save(&entry).await?;
        village_repo.save(&village).await?;

        info!(
            task = entry.task.label(),
            refund = refund.total(),
            "Queue entry cancelled"
        );

        Ok(refund)
    }
}
