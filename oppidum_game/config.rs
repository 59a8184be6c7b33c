use oppidum_types::{
    army::{UNIT_KINDS, UnitKind},
    buildings::BuildingKind,
    common::ResourceBundle,
};

/// Combat and training data for one unit kind.
#[derive(Debug, Clone)]
pub struct UnitStats {
    pub kind: UnitKind,
    pub attack: u32,
    pub defense: u32,
    /// Loot the unit can carry home from a battle.
    pub carry: u32,
    /// Crop consumed per hour per unit.
    pub upkeep: u32,
    pub cost: ResourceBundle,
    /// Training time per unit at server speed 1.
    pub training_secs: u64,
}

/// Construction data for one building kind.
#[derive(Debug, Clone)]
pub struct BuildingStats {
    pub kind: BuildingKind,
    /// Upgrading to level N costs `base_cost * N`.
    pub base_cost: ResourceBundle,
    /// Upgrading to level N takes `base_secs * N` at server speed 1.
    pub base_secs: u64,
    /// Population added per building level.
    pub population: u32,
}

/// Tunable combat parameters. Any monotonic bounded curve works here;
/// the defaults are documented in DESIGN.md.
#[derive(Debug, Clone)]
pub struct CombatTuning {
    /// Attacker wins at `ratio >= victory_threshold`, loses at
    /// `ratio <= 1 / victory_threshold`, draws in between.
    pub victory_threshold: f64,
    /// Exponent of the loss split curve `f = ratio^loss_exponent`.
    pub loss_exponent: f64,
    /// Share of the defender's stock lootable on a victory.
    pub loot_fraction: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            victory_threshold: 1.25,
            loss_exponent: 1.5,
            loot_fraction: 0.5,
        }
    }
}

/// The balance tables of the game. Injected into every operation so that
/// tuning changes never require touching the engine.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Server speed, divides all durations. Clamped to 1..=5 by the loader.
    pub speed: u8,
    pub max_building_level: u8,
    /// Storage available with no warehouse/granary levels at all.
    pub base_storage: u64,
    /// Capacity added per warehouse/granary level.
    pub storage_per_level: u64,
    /// Gross resource production per hour per field level.
    pub production_per_level: u64,
    pub combat: CombatTuning,
    pub units: [UnitStats; UNIT_KINDS],
    pub buildings: [BuildingStats; 7],
}

impl GameConfig {
    pub fn unit(&self, kind: UnitKind) -> &UnitStats {
        &self.units[kind.idx()]
    }

    pub fn building(&self, kind: BuildingKind) -> &BuildingStats {
        &self.buildings[kind.idx()]
    }

    /// Cost of upgrading a building to `to_level`.
    pub fn upgrade_cost(&self, kind: BuildingKind, to_level: u8) -> ResourceBundle {
        self.building(kind).base_cost.clone() * to_level as u32
    }

    /// Duration of upgrading a building to `to_level`, scaled by speed.
    pub fn upgrade_secs(&self, kind: BuildingKind, to_level: u8) -> u64 {
        (self.building(kind).base_secs * to_level as u64 / self.speed as u64).max(1)
    }

    /// Cost of training `quantity` units of a kind.
    pub fn training_cost(&self, kind: UnitKind, quantity: u32) -> ResourceBundle {
        self.unit(kind).cost.clone() * quantity
    }

    /// Duration of training `quantity` units, scaled by speed.
    pub fn training_secs(&self, kind: UnitKind, quantity: u32) -> u64 {
        (self.unit(kind).training_secs * quantity as u64 / self.speed as u64).max(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: 1,
            max_building_level: 20,
            base_storage: 800,
            storage_per_level: 1000,
            production_per_level: 30,
            combat: CombatTuning::default(),
            units: [
                UnitStats {
                    kind: UnitKind::Spearman,
                    attack: 40,
                    defense: 35,
                    carry: 50,
                    upkeep: 1,
                    cost: ResourceBundle::new(120, 100, 150, 30),
                    training_secs: 1600,
                },
                UnitStats {
                    kind: UnitKind::Swordsman,
                    attack: 65,
                    defense: 30,
                    carry: 45,
                    upkeep: 1,
                    cost: ResourceBundle::new(140, 150, 185, 60),
                    training_secs: 1800,
                },
                UnitStats {
                    kind: UnitKind::Archer,
                    attack: 50,
                    defense: 40,
                    carry: 35,
                    upkeep: 1,
                    cost: ResourceBundle::new(100, 130, 160, 70),
                    training_secs: 1700,
                },
                UnitStats {
                    kind: UnitKind::Knight,
                    attack: 130,
                    defense: 70,
                    carry: 80,
                    upkeep: 3,
                    cost: ResourceBundle::new(450, 515, 480, 80),
                    training_secs: 2600,
                },
            ],
            buildings: [
                BuildingStats {
                    kind: BuildingKind::Woodcutter,
                    base_cost: ResourceBundle::new(40, 100, 50, 60),
                    base_secs: 260,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::ClayPit,
                    base_cost: ResourceBundle::new(80, 40, 80, 50),
                    base_secs: 220,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::IronMine,
                    base_cost: ResourceBundle::new(100, 80, 30, 60),
                    base_secs: 450,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::Cropland,
                    base_cost: ResourceBundle::new(70, 90, 70, 20),
                    base_secs: 150,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::Warehouse,
                    base_cost: ResourceBundle::new(130, 160, 90, 40),
                    base_secs: 2000,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::Granary,
                    base_cost: ResourceBundle::new(80, 100, 70, 20),
                    base_secs: 1600,
                    population: 1,
                },
                BuildingStats {
                    kind: BuildingKind::Barracks,
                    base_cost: ResourceBundle::new(210, 140, 260, 120),
                    base_secs: 2000,
                    population: 4,
                },
            ],
        }
    }
}
