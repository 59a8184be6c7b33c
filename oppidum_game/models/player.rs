use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::errors::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub username: String,
    alliance_id: Option<Uuid>,
    points: u64,
}

impl Player {
    pub fn new(username: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            alliance_id: None,
            points: 0,
        }
    }

    /// Constructor for re-hydrating a Player from persistence.
    pub fn from_persistence(
        id: Uuid,
        username: String,
        alliance_id: Option<Uuid>,
        points: u64,
    ) -> Self {
        Self {
            id,
            username,
            alliance_id,
            points,
        }
    }

    pub fn alliance_id(&self) -> Option<Uuid> {
        self.alliance_id
    }

    /// Ranking score, grown by battles won.
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn award_points(&mut self, points: u64) {
        self.points += points;
    }

    /// Adds the player to an alliance. A player belongs to one at a time.
    pub fn join_alliance(&mut self, alliance_id: Uuid) -> Result<(), GameError> {
        if let Some(current) = self.alliance_id {
            return Err(GameError::AlreadyInAlliance(current));
        }
        self.alliance_id = Some(alliance_id);
        Ok(())
    }

    /// Removes the player from their alliance, returning which one they left.
    pub fn leave_alliance(&mut self) -> Result<Uuid, GameError> {
        let alliance_id = self
            .alliance_id
            .take()
            .ok_or(GameError::NotInAlliance(self.id))?;
        Ok(alliance_id)
    }
}
