use serde::{Deserialize, Serialize};

use crate::army::UnitKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    Active,
    Completed,
    Cancelled,
}

impl QueueStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, QueueStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// The timed effect a queue entry applies when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueTask {
    UpgradeBuilding { slot_id: u8, to_level: u8 },
    TrainUnits { unit: UnitKind, quantity: u32 },
}

impl QueueTask {
    /// Short tag used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            QueueTask::UpgradeBuilding { .. } => "building_upgrade",
            QueueTask::TrainUnits { .. } => "unit_training",
        }
    }
}
