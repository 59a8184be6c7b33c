use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{
    common::ResourceBundle,
    errors::GameError,
    queue::{QueueStatus, QueueTask},
};

/// A scheduled job charged up front. Completion and cancellation are the
/// only transitions out of `Active`, and both happen exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: Uuid,
    pub village_id: Uuid,
    pub task: QueueTask,
    cost: ResourceBundle,
    pub started_at: DateTime<Utc>,
    pub completes_at: DateTime<Utc>,
    status: QueueStatus,
}

impl QueueEntry {
    pub fn new(
        village_id: Uuid,
        task: QueueTask,
        cost: ResourceBundle,
        started_at: DateTime<Utc>,
        duration_secs: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            village_id,
            task,
            cost,
            started_at,
            completes_at: started_at + Duration::seconds(duration_secs as i64),
            status: QueueStatus::Active,
        }
    }

    /// Constructor for re-hydrating a QueueEntry from persistence.
    pub fn from_persistence(
        id: Uuid,
        village_id: Uuid,
        task: QueueTask,
        cost: ResourceBundle,
        started_at: DateTime<Utc>,
        completes_at: DateTime<Utc>,
        status: QueueStatus,
    ) -> Self {
        Self {
            id,
            village_id,
            task,
            cost,
            started_at,
            completes_at,
            status,
        }
    }

    pub fn status(&self) -> QueueStatus {
        self.status
    }

    /// The resources withdrawn when the entry was enqueued.
    pub fn cost(&self) -> &ResourceBundle {
        &self.cost
    }

    /// True if the entry is still active and its deadline has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && self.completes_at <= now
    }

    /// Marks the entry completed. Only an active entry can complete.
    pub fn complete(&mut self) -> Result<(), GameError> {
        if !self.status.is_active() {
            return Err(GameError::InvalidQueueState(self.id));
        }
        self.status = QueueStatus::Completed;
        Ok(())
    }

    /// Cancels an active entry and returns the refund: between half and the
    /// whole of the original cost, proportional to the time still remaining.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<ResourceBundle, GameError> {
        if !self.status.is_active() {
            return Err(GameError::InvalidQueueState(self.id));
        }
        let refund = self.cost.clone() * self.refund_fraction(now);
        self.status = QueueStatus::Cancelled;
        Ok(refund)
    }

    /// Fraction of the cost returned on cancellation, in [0.5, 1.0].
    pub fn refund_fraction(&self, now: DateTime<Utc>) -> f64 {
        let total = (self.completes_at - self.started_at).num_seconds() as f64;
        if total <= 0.0 {
            return 0.5;
        }
        let remaining = (self.completes_at - now).num_seconds() as f64;
        (remaining / total).clamp(0.5, 1.0)
    }
}
