use oppidum_types::{
    army::{TroopSet, UNIT_KINDS},
    battle::BattleResult,
    common::ResourceBundle,
};

use crate::{config::GameConfig, models::army::Army};

#[derive(Debug, Clone, PartialEq)]
pub struct CombatOutcome {
    pub result: BattleResult,
    pub attacker_losses: TroopSet,
    pub defender_losses: TroopSet,
}

/// Resolves a battle from the two armies alone. The power ratio drives a
/// loss factor `ratio^exponent`; each side then loses the matching share of
/// every unit line, rounded and never above its strength. The same input
/// always produces the same outcome.
pub fn resolve(attacker: &Army, defender: &Army, config: &GameConfig) -> CombatOutcome {
    let attack_power = attacker.attack_points(config);
    let defense_power = defender.defense_points(config);

    if defense_power == 0 {
        return CombatOutcome {
            result: BattleResult::Victory,
            attacker_losses: [0; UNIT_KINDS],
            defender_losses: *defender.units(),
        };
    }
    if attack_power == 0 {
        return CombatOutcome {
            result: BattleResult::Defeat,
            attacker_losses: *attacker.units(),
            defender_losses: [0; UNIT_KINDS],
        };
    }

    let ratio = attack_power as f64 / defense_power as f64;
    let factor = ratio.powf(config.combat.loss_exponent);
    let attacker_rate = 1.0 / (1.0 + factor);
    let defender_rate = factor / (1.0 + factor);

    let result = if ratio >= config.combat.victory_threshold {
        BattleResult::Victory
    } else if ratio <= 1.0 / config.combat.victory_threshold {
        BattleResult::Defeat
    } else {
        BattleResult::Draw
    };

    CombatOutcome {
        result,
        attacker_losses: scale_losses(attacker.units(), attacker_rate),
        defender_losses: scale_losses(defender.units(), defender_rate),
    }
}

fn scale_losses(units: &TroopSet, rate: f64) -> TroopSet {
    let mut losses = [0u32; UNIT_KINDS];
    for (idx, &qty) in units.iter().enumerate() {
        let hit = (qty as f64 * rate).round() as u32;
        losses[idx] = hit.min(qty);
    }
    losses
}

/// Picks the loot for a victorious raid: a fraction of the defender stocks,
/// scaled down proportionally when it exceeds what the survivors can carry.
/// The caller still clamps against the live balance when withdrawing.
pub fn plunder(
    defender_balance: &ResourceBundle,
    fraction: f64,
    carry_capacity: u64,
) -> ResourceBundle {
    let desired = defender_balance.clone() * fraction;
    let total = desired.total();
    if total <= carry_capacity {
        return desired;
    }

    let scale = carry_capacity as f64 / total as f64;
    desired * scale
}
