use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a resolved attack, from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    Victory,
    Defeat,
    Draw,
}

impl fmt::Display for BattleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattleResult::Victory => "victory",
            BattleResult::Defeat => "defeat",
            BattleResult::Draw => "draw",
        };
        write!(f, "{}", name)
    }
}
