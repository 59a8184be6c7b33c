use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{
    army::{TroopSet, UnitKind},
    buildings::BuildingKind,
    common::{Resource, ResourceBundle},
    errors::GameError,
};

use crate::config::GameConfig;

use super::army::Army;

pub const RESOURCE_FIELDS_LAST_SLOT: u8 = 18;
pub const WAREHOUSE_SLOT_ID: u8 = 19;
pub const GRANARY_SLOT_ID: u8 = 20;
pub const BARRACKS_SLOT_ID: u8 = 21;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub slot_id: u8,
    pub kind: BuildingKind,
    pub level: u8,
    pub upgrading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Village {
    pub id: Uuid,
    pub name: String,
    pub player_id: Uuid,
    pub population: u32,
    buildings: Vec<Building>,
    army: Army,
    stocks: VillageStocks,
    pub production: VillageProduction,
    pub updated_at: DateTime<Utc>,
    version: u64,
}

impl Village {
    /// Returns a new village with the standard starting layout: eighteen
    /// level-0 resource fields plus level-1 warehouse, granary and barracks.
    pub fn new(name: String, player_id: Uuid, config: &GameConfig, now: DateTime<Utc>) -> Self {
        let mut village = Self {
            id: Uuid::new_v4(),
            name,
            player_id,
            population: 0,
            buildings: standard_buildings(),
            army: Army::empty(),
            stocks: VillageStocks::default(),
            production: Default::default(),
            updated_at: now,
            version: 0,
        };

        village.update_state(config);
        village
    }

    /// Constructor for re-hydrating a Village from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        player_id: Uuid,
        buildings: Vec<Building>,
        army: Army,
        stocks: VillageStocks,
        updated_at: DateTime<Utc>,
        version: u64,
        config: &GameConfig,
    ) -> Self {
        let mut village = Self {
            id,
            name,
            player_id,
            population: 0,
            buildings,
            army,
            stocks,
            production: Default::default(),
            updated_at,
            version,
        };

        village.update_state(config);
        village
    }

    /// Returns a reference to the village buildings for persistence (serialization).
    /// This should primarily be used by the repository layer.
    pub fn buildings(&self) -> &Vec<Building> {
        &self.buildings
    }

    /// Returns a reference to the village stocks for persistence (serialization).
    pub fn stocks(&self) -> &VillageStocks {
        &self.stocks
    }

    pub fn army(&self) -> &Army {
        &self.army
    }

    /// Optimistic-concurrency version of this row.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advances the version. Called by repositories after a successful save.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }

    /// Returns a snapshot of the currently stored resources.
    pub fn balance(&self) -> ResourceBundle {
        self.stocks.stored()
    }

    /// Gets the current warehouse capacity.
    pub fn warehouse_capacity(&self) -> u64 {
        self.stocks.warehouse_capacity
    }

    /// Gets the current granary capacity.
    pub fn granary_capacity(&self) -> u64 {
        self.stocks.granary_capacity
    }

    /// Catches the stocks up with production since the last sync. Accrual is
    /// capped at storage capacity; a negative net crop rate drains the
    /// granary down to zero at worst. A non-positive span is a no-op, so
    /// replaying past deadlines never rewinds the clock.
    pub fn sync(&mut self, now: DateTime<Utc>) {
        let elapsed_secs = (now - self.updated_at).num_seconds() as f64;
        if elapsed_secs <= 0.0 {
            return;
        }

        let deltas = self.production.deltas(elapsed_secs);
        self.stocks.accrue(deltas);
        self.updated_at = now;
    }

    /// Checks if the village has enough resources.
    pub fn has_enough_resources(&self, cost: &ResourceBundle) -> bool {
        self.stocks.has_availability(cost)
    }

    /// Tries to deduct resources. Fails with InsufficientResources leaving
    /// the balance untouched.
    pub fn debit(&mut self, cost: &ResourceBundle) -> Result<(), GameError> {
        if !self.has_enough_resources(cost) {
            return Err(GameError::InsufficientResources);
        }
        self.stocks.remove(cost);
        Ok(())
    }

    /// Stores resources in the village. Explicit credits are never capped,
    /// only production accrual respects capacity.
    pub fn credit(&mut self, resources: &ResourceBundle) {
        self.stocks.deposit(resources);
    }

    pub fn debit_resource(&mut self, resource: Resource, amount: u64) -> Result<(), GameError> {
        self.debit(&ResourceBundle::of(resource, amount))
    }

    pub fn credit_resource(&mut self, resource: Resource, amount: u64) {
        self.credit(&ResourceBundle::of(resource, amount));
    }

    /// Returns the building on a given slot. Returns None if not present.
    pub fn building(&self, slot_id: u8) -> Option<&Building> {
        self.buildings.iter().find(|b| b.slot_id == slot_id)
    }

    /// True if the village has at least one working building of the kind.
    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.buildings
            .iter()
            .any(|b| b.kind == kind && b.level >= 1)
    }

    /// Prepares a building upgrade: validates the slot, withdraws the cost
    /// and marks the slot busy. Returns the target level, the cost taken and
    /// the build time in seconds.
    pub fn init_building_upgrade(
        &mut self,
        slot_id: u8,
        config: &GameConfig,
    ) -> Result<(u8, ResourceBundle, u64), GameError> {
        let idx = self
            .buildings
            .iter()
            .position(|b| b.slot_id == slot_id)
            .ok_or(GameError::BuildingNotFound { slot_id })?;

        if self.buildings[idx].upgrading {
            return Err(GameError::UpgradeInProgress { slot_id });
        }
        let level = self.buildings[idx].level;
        if level >= config.max_building_level {
            return Err(GameError::BuildingAtMaxLevel { slot_id, level });
        }

        let kind = self.buildings[idx].kind;
        let to_level = level + 1;
        let cost = config.upgrade_cost(kind, to_level);
        self.debit(&cost)?;
        self.buildings[idx].upgrading = true;

        Ok((to_level, cost, config.upgrade_secs(kind, to_level)))
    }

    /// Clears the busy flag of a cancelled upgrade.
    pub fn cancel_building_upgrade(&mut self, slot_id: u8) -> Result<(), GameError> {
        let idx = self
            .buildings
            .iter()
            .position(|b| b.slot_id == slot_id)
            .ok_or(GameError::BuildingNotFound { slot_id })?;

        self.buildings[idx].upgrading = false;
        Ok(())
    }

    /// Applies a finished upgrade and recomputes the derived state.
    pub fn apply_building_upgrade(
        &mut self,
        slot_id: u8,
        to_level: u8,
        config: &GameConfig,
    ) -> Result<(), GameError> {
        let idx = self
            .buildings
            .iter()
            .position(|b| b.slot_id == slot_id)
            .ok_or(GameError::BuildingNotFound { slot_id })?;

        self.buildings[idx].level = to_level;
        self.buildings[idx].upgrading = false;
        self.update_state(config);
        Ok(())
    }

    /// Prepares a training order: validates it and withdraws the cost.
    /// Returns the cost taken and the training time in seconds.
    pub fn init_unit_training(
        &mut self,
        unit: UnitKind,
        quantity: u32,
        config: &GameConfig,
    ) -> Result<(ResourceBundle, u64), GameError> {
        if quantity == 0 {
            return Err(GameError::InvalidTrainingQuantity);
        }
        if !self.has_building(BuildingKind::Barracks) {
            return Err(GameError::MissingBuilding(BuildingKind::Barracks));
        }

        let cost = config.training_cost(unit, quantity);
        self.debit(&cost)?;

        Ok((cost, config.training_secs(unit, quantity)))
    }

    /// Adds freshly trained units to the garrison.
    pub fn apply_unit_training(&mut self, unit: UnitKind, quantity: u32, config: &GameConfig) {
        self.army.add_units(unit, quantity);
        self.update_state(config);
    }

    /// Removes fallen units from the garrison.
    pub fn apply_combat_losses(&mut self, losses: &TroopSet, config: &GameConfig) {
        self.army.apply_losses(losses);
        self.update_state(config);
    }

    /// Updates the derived village state (population, production, capacities).
    fn update_state(&mut self, config: &GameConfig) {
        self.population = 0;
        self.production = Default::default();
        self.stocks.warehouse_capacity = config.base_storage;
        self.stocks.granary_capacity = config.base_storage;

        for b in self.buildings.iter() {
            self.population += config.building(b.kind).population * b.level as u32;

            let rate = config.production_per_level * b.level as u64;
            match b.kind {
                BuildingKind::Woodcutter => self.production.wood += rate,
                BuildingKind::ClayPit => self.production.clay += rate,
                BuildingKind::IronMine => self.production.iron += rate,
                BuildingKind::Cropland => self.production.crop += rate,
                BuildingKind::Warehouse => {
                    self.stocks.warehouse_capacity += config.storage_per_level * b.level as u64
                }
                BuildingKind::Granary => {
                    self.stocks.granary_capacity += config.storage_per_level * b.level as u64
                }
                BuildingKind::Barracks => continue,
            }
        }

        // population and garrison both eat crop
        self.production.upkeep = self.population as u64 + self.army.upkeep(config);
        self.production.calculate_effective();
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// **[TEST ONLY]** Replace the stored resources.
    pub fn set_stocks_for_test(&mut self, balance: ResourceBundle) {
        self.stocks.balance = balance;
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// **[TEST ONLY]** Replace the garrison.
    pub fn set_units_for_test(&mut self, units: &TroopSet, config: &GameConfig) {
        self.army = Army::new(units);
        self.update_state(config);
    }

    #[cfg(any(test, feature = "test-utils"))]
    /// **[TEST ONLY]** Force a building level.
    pub fn set_building_level_for_test(&mut self, slot_id: u8, level: u8, config: &GameConfig) {
        if let Some(idx) = self.buildings.iter().position(|b| b.slot_id == slot_id) {
            self.buildings[idx].level = level;
            self.update_state(config);
        }
    }
}

fn standard_buildings() -> Vec<Building> {
    let mut buildings = Vec::new();
    for slot_id in 1..=RESOURCE_FIELDS_LAST_SLOT {
        let kind = match slot_id {
            1..=4 => BuildingKind::Woodcutter,
            5..=8 => BuildingKind::ClayPit,
            9..=12 => BuildingKind::IronMine,
            _ => BuildingKind::Cropland,
        };
        buildings.push(Building {
            slot_id,
            kind,
            level: 0,
            upgrading: false,
        });
    }
    for (slot_id, kind) in [
        (WAREHOUSE_SLOT_ID, BuildingKind::Warehouse),
        (GRANARY_SLOT_ID, BuildingKind::Granary),
        (BARRACKS_SLOT_ID, BuildingKind::Barracks),
    ] {
        buildings.push(Building {
            slot_id,
            kind,
            level: 1,
            upgrading: false,
        });
    }
    buildings
}

/// Gross per-hour production with the crop upkeep ready to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VillageProduction {
    pub wood: u64,
    pub clay: u64,
    pub iron: u64,
    pub crop: u64,
    pub upkeep: u64,
    pub effective_crop: i64,
}

impl VillageProduction {
    pub fn calculate_effective(&mut self) {
        self.effective_crop = self.crop as i64 - self.upkeep as i64;
    }

    /// Per-resource stock deltas for an elapsed span. Crop uses the
    /// effective rate and may be negative.
    pub fn deltas(&self, elapsed_secs: f64) -> (f64, f64, f64, f64) {
        let wood = self.wood as f64 / 3600.0 * elapsed_secs;
        let clay = self.clay as f64 / 3600.0 * elapsed_secs;
        let iron = self.iron as f64 / 3600.0 * elapsed_secs;
        let crop = self.effective_crop as f64 / 3600.0 * elapsed_secs;

        (wood, clay, iron, crop)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageStocks {
    pub warehouse_capacity: u64,
    pub granary_capacity: u64,
    balance: ResourceBundle,
}

impl VillageStocks {
    pub fn new(warehouse_capacity: u64, granary_capacity: u64, balance: ResourceBundle) -> Self {
        Self {
            warehouse_capacity,
            granary_capacity,
            balance,
        }
    }

    /// Returns the currently stored resources.
    pub(crate) fn stored(&self) -> ResourceBundle {
        self.balance.clone()
    }

    /// Stores resources without a capacity cap.
    pub(crate) fn deposit(&mut self, resources: &ResourceBundle) {
        self.balance += resources;
    }

    /// Checks if given resources are present in stocks.
    pub(crate) fn has_availability(&self, resources: &ResourceBundle) -> bool {
        self.balance.covers(resources)
    }

    /// Removes resources from the stocks. Callers check availability first.
    pub(crate) fn remove(&mut self, resources: &ResourceBundle) {
        self.balance -= resources;
    }

    /// Applies production deltas, capping at capacity and clamping crop at
    /// zero. A balance already above capacity is left as is; production
    /// simply stops adding to it.
    pub(crate) fn accrue(&mut self, deltas: (f64, f64, f64, f64)) {
        let (wood, clay, iron, crop) = deltas;
        self.balance.wood = accrue_capped(self.balance.wood, wood, self.warehouse_capacity);
        self.balance.clay = accrue_capped(self.balance.clay, clay, self.warehouse_capacity);
        self.balance.iron = accrue_capped(self.balance.iron, iron, self.warehouse_capacity);
        self.balance.crop = accrue_capped(self.balance.crop, crop, self.granary_capacity);
    }
}

fn accrue_capped(current: u64, delta: f64, capacity: u64) -> u64 {
    let ceiling = capacity.max(current) as f64;
    (current as f64 + delta).min(ceiling).max(0.0).floor() as u64
}

impl Default for VillageStocks {
    fn default() -> Self {
        Self {
            warehouse_capacity: 800, // Base capacity
            granary_capacity: 800,   // Base capacity
            balance: ResourceBundle::new(800, 800, 800, 800),
        }
    }
}
