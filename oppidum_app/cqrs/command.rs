use async_trait::async_trait;
use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::{clock::Clock, config::Config, events::EventSink, uow::UnitOfWork};

/// A marker trait for Command structs.
/// Commands are operations that change the state of the system. Each one
/// declares what it hands back to the caller once applied.
pub trait Command: Send + Sync {
    type Output: Send + Sync;
}

/// Shared services every handler runs with: static configuration, the time
/// source and the event sink.
pub struct HandlerContext {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub events: Arc<dyn EventSink>,
}

/// A trait for handlers that execute Commands.
/// It receives the command and a Unit of Work (&Box<dyn UnitOfWork...>) to use.
/// It should NOT manage the transaction lifecycle (commit/rollback);
/// that is the job of the AppBus.
#[async_trait]
pub trait CommandHandler<C: Command> {
    async fn handle(
        &self,
        cmd: C,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<C::Output, ApplicationError>;
}
