use tracing::{info, instrument};

use oppidum_game::models::queue::QueueEntry;
use oppidum_types::{
    errors::{ApplicationError, GameError},
    queue::QueueTask,
};

use crate::{
    completion::settle_due_entries,
    cqrs::{CommandHandler, HandlerContext, commands::TrainUnits},
    uow::UnitOfWork,
};

pub struct TrainUnitsCommandHandler {}

impl Default for TrainUnitsCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainUnitsCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<TrainUnits> for TrainUnitsCommandHandler {
    #[instrument(skip_all, fields(
        village_id = %command.village_id,
        unit = %command.unit,
        quantity = command.quantity,
    ))]
    async fn handle(
        &self,
        command: TrainUnits,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<QueueEntry, ApplicationError> {
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

        settle_due_entries(uow, &mut village, now, ctx).await?;

        // One batch per unit kind at a time
        let active = queue_repo.list_active_by_village(command.village_id).await?;
        let already_training = active.iter().any(|e| {
            matches!(e.task, QueueTask::TrainUnits { unit, .. } if unit == command.unit)
        });
        if already_training {
            return Err(GameError::TrainingInProgress { unit: command.unit }.into());
        }

        let (cost, duration_secs) =
            village.init_unit_training(command.unit, command.quantity, &ctx.config.game)?;

        let entry = QueueEntry::new(
            command.village_id,
            QueueTask::TrainUnits {
                unit: command.unit,
                quantity: command.quantity,
            },
            cost,
            now,
            duration_secs,
        );

        village_repo.save(&village).await?;
        queue_repo.add(&entry).await?;

        info!(
            entry_id = %entry.id,
            completes_at = %entry.completes_at,
            "Unit training queued"
        );

        Ok(entry)
    }
}
