use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct unit kinds.
pub const UNIT_KINDS: usize = 4;

/// Troop quantities indexed by `UnitKind::idx()`.
pub type TroopSet = [u32; UNIT_KINDS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Spearman,
    Swordsman,
    Archer,
    Knight,
}

impl UnitKind {
    pub const ALL: [UnitKind; UNIT_KINDS] = [
        UnitKind::Spearman,
        UnitKind::Swordsman,
        UnitKind::Archer,
        UnitKind::Knight,
    ];

    pub const fn idx(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Spearman => "Spearman",
            UnitKind::Swordsman => "Swordsman",
            UnitKind::Archer => "Archer",
            UnitKind::Knight => "Knight",
        };
        write!(f, "{}", name)
    }
}
