use std::sync::Arc;

use tracing::warn;

use oppidum_types::errors::{AppError, ApplicationError};

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    cqrs::{Command, CommandHandler, HandlerContext, Query, QueryHandler},
    events::{EventSink, NoopEventSink},
    uow::UnitOfWorkProvider,
};

/// AppBus (Mediator)
/// This struct is the central entry point for all application logic.
/// It does not contain any business logic itself.
/// Its primary roles are:
/// 1. Managing Unit of Work (transaction) lifecycles.
/// 2. Dispatching Commands and Queries to their respective handlers.
/// 3. Re-running commands that lose an optimistic concurrency race.
pub struct AppBus {
    ctx: HandlerContext,
    uow_provider: Arc<dyn UnitOfWorkProvider>,
}

impl AppBus {
    pub fn new(config: Arc<Config>, uow_provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self::with_services(
            config,
            uow_provider,
            Arc::new(SystemClock::new()),
            Arc::new(NoopEventSink::new()),
        )
    }

    pub fn with_services(
        config: Arc<Config>,
        uow_provider: Arc<dyn UnitOfWorkProvider>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            ctx: HandlerContext {
                config,
                clock,
                events,
            },
            uow_provider,
        }
    }

    /// Executes a command.
    /// A command is an operation that modifies the system state.
    /// This method manages the transaction:
    /// - It begins a Unit of Work.
    /// - It passes the UoW to the handler.
    /// - If the handler succeeds, it commits the UoW.
    /// - If the handler fails, it rolls back the UoW.
    /// A `ConcurrentModification` failure rolls back and replays the whole
    /// command on a fresh transaction, up to the configured attempt budget.
    pub async fn execute<C, H>(&self, cmd: C, handler: H) -> Result<C::Output, ApplicationError>
    where
        C: Command + Clone,
        H: CommandHandler<C>,
    {
        let max_attempts = self.ctx.config.max_conflict_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let uow = self.uow_provider.tx().await?;

            match handler.handle(cmd.clone(), &uow, &self.ctx).await {
                Ok(output) => {
                    uow.commit().await?; // Commit on success
                    return Ok(output);
                }
                Err(e) if e.is_conflict() => {
                    uow.rollback().await?;
                    if attempt >= max_attempts {
                        return Err(ApplicationError::App(AppError::ConflictRetriesExhausted {
                            attempts: attempt,
                        }));
                    }
                    warn!(attempt, "Command hit a concurrent modification, retrying");
                }
                Err(e) => {
                    uow.rollback().await?; // Rollback on failure
                    return Err(e);
                }
            }
        }
    }

    /// Executes a query.
    /// A query is an operation that reads system state and returns data.
    /// It should *never* modify the state.
    /// This method ensures the transaction is *always* rolled back.
    pub async fn query<Q, H>(&self, query: Q, handler: H) -> Result<Q::Output, ApplicationError>
    where
        Q: Query,
        H: QueryHandler<Q>,
    {
        let uow = self.uow_provider.tx().await?;

        let result = handler.handle(query, &uow, &self.ctx).await;

        // Always rollback a query, as it should never write data.
        uow.rollback().await?;

        result
    }
}
