use serde::{Deserialize, Serialize};

/// Lifecycle of a war between two alliances.
/// Transitions: Proposed -> Active (accept), Proposed -> Ended (decline),
/// Active -> Ended (peace or disband). Ended is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarStatus {
    Proposed,
    Active,
    Ended,
}

impl WarStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, WarStatus::Active)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, WarStatus::Ended)
    }
}
