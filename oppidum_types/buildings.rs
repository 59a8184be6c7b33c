use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Woodcutter,
    ClayPit,
    IronMine,
    Cropland,
    Warehouse,
    Granary,
    Barracks,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 7] = [
        BuildingKind::Woodcutter,
        BuildingKind::ClayPit,
        BuildingKind::IronMine,
        BuildingKind::Cropland,
        BuildingKind::Warehouse,
        BuildingKind::Granary,
        BuildingKind::Barracks,
    ];

    pub const fn idx(&self) -> usize {
        *self as usize
    }

    /// The resource this building produces, if it is a production building.
    pub fn produced_resource(&self) -> Option<Resource> {
        match self {
            BuildingKind::Woodcutter => Some(Resource::Wood),
            BuildingKind::ClayPit => Some(Resource::Clay),
            BuildingKind::IronMine => Some(Resource::Iron),
            BuildingKind::Cropland => Some(Resource::Crop),
            _ => None,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildingKind::Woodcutter => "Woodcutter",
            BuildingKind::ClayPit => "Clay Pit",
            BuildingKind::IronMine => "Iron Mine",
            BuildingKind::Cropland => "Cropland",
            BuildingKind::Warehouse => "Warehouse",
            BuildingKind::Granary => "Granary",
            BuildingKind::Barracks => "Barracks",
        };
        write!(f, "{}", name)
    }
}
