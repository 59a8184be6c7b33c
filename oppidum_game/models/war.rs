use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{diplomacy::WarStatus, errors::GameError};

/// A declared war between two alliances. Starts as a proposal by the
/// attacker and only counts for battles once the defender accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct War {
    pub id: Uuid,
    pub attacker_alliance_id: Uuid,
    pub defender_alliance_id: Uuid,
    status: WarStatus,
    pub declared_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl War {
    pub fn new(
        attacker_alliance_id: Uuid,
        defender_alliance_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        if attacker_alliance_id == defender_alliance_id {
            return Err(GameError::SelfWarRejected);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            attacker_alliance_id,
            defender_alliance_id,
            status: WarStatus::Proposed,
            declared_at: now,
            started_at: None,
            ended_at: None,
        })
    }

    /// Constructor for re-hydrating a War from persistence.
    pub fn from_persistence(
        id: Uuid,
        attacker_alliance_id: Uuid,
        defender_alliance_id: Uuid,
        status: WarStatus,
        declared_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            attacker_alliance_id,
            defender_alliance_id,
            status,
            declared_at,
            started_at,
            ended_at,
        }
    }

    pub fn status(&self) -> WarStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn involves(&self, alliance_id: Uuid) -> bool {
        self.attacker_alliance_id == alliance_id || self.defender_alliance_id == alliance_id
    }

    /// True if the war is between these two alliances, in either role.
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.attacker_alliance_id == a && self.defender_alliance_id == b)
            || (self.attacker_alliance_id == b && self.defender_alliance_id == a)
    }

    /// The defender accepts the proposal and hostilities open.
    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        if self.status != WarStatus::Proposed {
            return Err(GameError::InvalidWarState {
                war_id: self.id,
                status: self.status,
            });
        }
        self.status = WarStatus::Active;
        self.started_at = Some(now);
        Ok(())
    }

    /// Closes the war. A proposal can be ended too (a refusal); an ended
    /// war stays ended.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        if self.status == WarStatus::Ended {
            return Err(GameError::InvalidWarState {
                war_id: self.id,
                status: self.status,
            });
        }
        self.status = WarStatus::Ended;
        self.ended_at = Some(now);
        Ok(())
    }
}
