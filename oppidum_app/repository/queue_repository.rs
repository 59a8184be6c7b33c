use chrono::{DateTime, Utc};
use uuid::Uuid;

use oppidum_game::models::queue::QueueEntry;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait QueueRepository: Send + Sync {
    async fn add(&self, entry: &QueueEntry) -> Result<(), ApplicationError>;
    async fn get_by_id(&self, entry_id: Uuid) -> Result<QueueEntry, ApplicationError>;

    async fn list_active_by_village(
        &self,
        village_id: Uuid,
    ) -> Result<Vec<QueueEntry>, ApplicationError>;

    /// Active entries whose deadline has passed, oldest deadline first.
    /// Settlement relies on that ordering.
    async fn list_due_by_village(
        &self,
        village_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<QueueEntry>, ApplicationError>;

    async fn save(&self, entry: &QueueEntry) -> Result<(), ApplicationError>;
}
