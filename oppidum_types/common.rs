use std::fmt;

use serde::{Deserialize, Serialize};

/// The four tradeable resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Clay,
    Iron,
    Crop,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Wood,
        Resource::Clay,
        Resource::Iron,
        Resource::Crop,
    ];

    /// The resource a counterparty pays in when trading this resource.
    /// Fixed cycle: wood -> clay -> iron -> crop -> wood.
    pub fn payment_resource(&self) -> Resource {
        match self {
            Resource::Wood => Resource::Clay,
            Resource::Clay => Resource::Iron,
            Resource::Iron => Resource::Crop,
            Resource::Crop => Resource::Wood,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Wood => "Wood",
            Resource::Clay => "Clay",
            Resource::Iron => "Iron",
            Resource::Crop => "Crop",
        };
        write!(f, "{}", name)
    }
}

/// A fixed set of per-resource amounts. Used for balances, costs, refunds
/// and loot alike, so conservation checks are plain field arithmetic.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBundle {
    pub wood: u64,
    pub clay: u64,
    pub iron: u64,
    pub crop: u64,
}

impl ResourceBundle {
    pub const ZERO: ResourceBundle = ResourceBundle::new(0, 0, 0, 0);

    pub const fn new(wood: u64, clay: u64, iron: u64, crop: u64) -> Self {
        Self {
            wood,
            clay,
            iron,
            crop,
        }
    }

    /// A bundle holding `amount` of a single resource.
    pub fn of(resource: Resource, amount: u64) -> Self {
        let mut bundle = Self::ZERO;
        bundle.set_amount(resource, amount);
        bundle
    }

    pub fn total(&self) -> u64 {
        self.wood + self.clay + self.iron + self.crop
    }

    pub fn amount(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Clay => self.clay,
            Resource::Iron => self.iron,
            Resource::Crop => self.crop,
        }
    }

    pub fn set_amount(&mut self, resource: Resource, amount: u64) {
        match resource {
            Resource::Wood => self.wood = amount,
            Resource::Clay => self.clay = amount,
            Resource::Iron => self.iron = amount,
            Resource::Crop => self.crop = amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// True if every field of `self` is at least the matching field of `other`.
    pub fn covers(&self, other: &ResourceBundle) -> bool {
        self.wood >= other.wood
            && self.clay >= other.clay
            && self.iron >= other.iron
            && self.crop >= other.crop
    }

    /// Per-resource minimum of the two bundles.
    pub fn clamped_to(&self, limit: &ResourceBundle) -> ResourceBundle {
        ResourceBundle {
            wood: self.wood.min(limit.wood),
            clay: self.clay.min(limit.clay),
            iron: self.iron.min(limit.iron),
            crop: self.crop.min(limit.crop),
        }
    }
}

impl core::ops::Add for ResourceBundle {
    type Output = ResourceBundle;

    fn add(self, rhs: ResourceBundle) -> Self::Output {
        ResourceBundle {
            wood: self.wood + rhs.wood,
            clay: self.clay + rhs.clay,
            iron: self.iron + rhs.iron,
            crop: self.crop + rhs.crop,
        }
    }
}

impl core::ops::AddAssign<&ResourceBundle> for ResourceBundle {
    fn add_assign(&mut self, rhs: &ResourceBundle) {
        self.wood += rhs.wood;
        self.clay += rhs.clay;
        self.iron += rhs.iron;
        self.crop += rhs.crop;
    }
}

impl core::ops::SubAssign<&ResourceBundle> for ResourceBundle {
    /// Saturating per field. Callers enforcing exact accounting check
    /// `covers` first.
    fn sub_assign(&mut self, rhs: &ResourceBundle) {
        self.wood = self.wood.saturating_sub(rhs.wood);
        self.clay = self.clay.saturating_sub(rhs.clay);
        self.iron = self.iron.saturating_sub(rhs.iron);
        self.crop = self.crop.saturating_sub(rhs.crop);
    }
}

impl core::ops::Mul<f64> for ResourceBundle {
    type Output = ResourceBundle;

    fn mul(self, rhs: f64) -> Self::Output {
        let wood = (self.wood as f64 * rhs).floor() as u64;
        let clay = (self.clay as f64 * rhs).floor() as u64;
        let iron = (self.iron as f64 * rhs).floor() as u64;
        let crop = (self.crop as f64 * rhs).floor() as u64;
        ResourceBundle::new(wood, clay, iron, crop)
    }
}

impl core::ops::Mul<u32> for ResourceBundle {
    type Output = ResourceBundle;

    fn mul(self, rhs: u32) -> Self::Output {
        let factor = rhs as u64;
        ResourceBundle {
            wood: self.wood * factor,
            clay: self.clay * factor,
            iron: self.iron * factor,
            crop: self.crop * factor,
        }
    }
}
