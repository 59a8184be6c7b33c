use serde::{Deserialize, Serialize};

use oppidum_types::{
    army::{TroopSet, UNIT_KINDS, UnitKind},
    errors::GameError,
};

use crate::config::GameConfig;

/// A garrison or a detached attacking force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    units: TroopSet,
}

impl Army {
    pub fn new(units: &TroopSet) -> Self {
        Army { units: *units }
    }

    pub fn empty() -> Self {
        Army {
            units: [0; UNIT_KINDS],
        }
    }

    pub fn units(&self) -> &TroopSet {
        &self.units
    }

    /// Returns the amount of a given unit.
    pub fn unit_amount(&self, kind: UnitKind) -> u32 {
        self.units[kind.idx()]
    }

    /// Returns the total raw number of troops.
    pub fn unit_count(&self) -> u32 {
        self.units.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.unit_count() == 0
    }

    /// Adds freshly trained units.
    pub fn add_units(&mut self, kind: UnitKind, quantity: u32) {
        self.units[kind.idx()] += quantity;
    }

    /// Splits off a detachment, validating availability. The garrison itself
    /// is left untouched; losses come back through `apply_losses`.
    pub fn deploy(&self, troops: &TroopSet) -> Result<Army, GameError> {
        if troops.iter().all(|&q| q == 0) {
            return Err(GameError::NoTroopsSelected);
        }
        for idx in 0..UNIT_KINDS {
            if troops[idx] > self.units[idx] {
                return Err(GameError::NotEnoughTroops);
            }
        }
        Ok(Army::new(troops))
    }

    /// Removes fallen units, never dropping below zero.
    pub fn apply_losses(&mut self, losses: &TroopSet) {
        for idx in 0..UNIT_KINDS {
            self.units[idx] = self.units[idx].saturating_sub(losses[idx]);
        }
    }

    /// Returns the total attack points of the army.
    pub fn attack_points(&self, config: &GameConfig) -> u64 {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, &quantity)| config.units[idx].attack as u64 * quantity as u64)
            .sum()
    }

    /// Returns the total defense points of the army.
    pub fn defense_points(&self, config: &GameConfig) -> u64 {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, &quantity)| config.units[idx].defense as u64 * quantity as u64)
            .sum()
    }

    /// Returns the total loot the army can carry.
    pub fn carry_capacity(&self, config: &GameConfig) -> u64 {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, &quantity)| config.units[idx].carry as u64 * quantity as u64)
            .sum()
    }

    /// Returns the total crop upkeep per hour of the army.
    pub fn upkeep(&self, config: &GameConfig) -> u64 {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, &quantity)| config.units[idx].upkeep as u64 * quantity as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_validates_availability() {
        let garrison = Army::new(&[10, 5, 0, 0]);

        let force = garrison.deploy(&[10, 2, 0, 0]).unwrap();
        assert_eq!(force.unit_count(), 12);

        let too_many = garrison.deploy(&[11, 0, 0, 0]);
        assert!(matches!(too_many, Err(GameError::NotEnoughTroops)));

        let nothing = garrison.deploy(&[0, 0, 0, 0]);
        assert!(matches!(nothing, Err(GameError::NoTroopsSelected)));
    }

    #[test]
    fn test_apply_losses_saturates() {
        let mut garrison = Army::new(&[10, 5, 0, 0]);
        garrison.apply_losses(&[3, 9, 1, 0]);
        assert_eq!(garrison.units(), &[7, 0, 0, 0]);
    }

    #[test]
    fn test_points_use_config_weights() {
        let config = GameConfig::default();
        let army = Army::new(&[2, 0, 0, 1]);

        let expected_attack =
            2 * config.units[0].attack as u64 + config.units[3].attack as u64;
        let expected_defense =
            2 * config.units[0].defense as u64 + config.units[3].defense as u64;

        assert_eq!(army.attack_points(&config), expected_attack);
        assert_eq!(army.defense_points(&config), expected_defense);
    }

    #[test]
    fn test_upkeep_and_carry() {
        let config = GameConfig::default();
        let army = Army::new(&[10, 0, 0, 2]);

        assert_eq!(army.upkeep(&config), 10 + 2 * 3);
        assert_eq!(army.carry_capacity(&config), 10 * 50 + 2 * 80);
    }
}
