use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{army::TroopSet, battle::BattleResult, common::ResourceBundle};

use crate::combat::CombatOutcome;

/// Immutable record of a fought battle, written once at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: Uuid,
    pub attacker_player_id: Uuid,
    pub attacker_village_id: Uuid,
    pub defender_player_id: Uuid,
    pub defender_village_id: Uuid,
    pub attacker_units: TroopSet,
    pub defender_units: TroopSet,
    pub attacker_losses: TroopSet,
    pub defender_losses: TroopSet,
    pub result: BattleResult,
    pub loot: ResourceBundle,
    /// Set when the battle counted towards an active war.
    pub war_id: Option<Uuid>,
    pub fought_at: DateTime<Utc>,
}

pub struct BattleSides {
    pub attacker_player_id: Uuid,
    pub attacker_village_id: Uuid,
    pub defender_player_id: Uuid,
    pub defender_village_id: Uuid,
    pub attacker_units: TroopSet,
    pub defender_units: TroopSet,
}

impl Battle {
    pub fn new(
        sides: BattleSides,
        outcome: &CombatOutcome,
        loot: ResourceBundle,
        war_id: Option<Uuid>,
        fought_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            attacker_player_id: sides.attacker_player_id,
            attacker_village_id: sides.attacker_village_id,
            defender_player_id: sides.defender_player_id,
            defender_village_id: sides.defender_village_id,
            attacker_units: sides.attacker_units,
            defender_units: sides.defender_units,
            attacker_losses: outcome.attacker_losses,
            defender_losses: outcome.defender_losses,
            result: outcome.result,
            loot,
            war_id,
            fought_at,
        }
    }

    /// Units the attacker destroyed.
    pub fn attacker_kills(&self) -> u32 {
        self.defender_losses.iter().sum()
    }

    /// Units the defender destroyed.
    pub fn defender_kills(&self) -> u32 {
        self.attacker_losses.iter().sum()
    }
}
