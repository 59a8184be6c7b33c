use dotenvy::dotenv;
use std::env;

use oppidum_game::config::GameConfig;

pub struct Config {
    pub game: GameConfig,
    /// How many times a command is retried when it loses an optimistic
    /// concurrency race before giving up.
    pub max_conflict_retries: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let mut game = GameConfig::default();

        game.speed = match env::var("OPPIDUM_GAME_SPEED") {
            Ok(val) => val.parse::<u8>().unwrap_or(1).clamp(1, 5),
            Err(_) => 1,
        };

        if let Ok(val) = env::var("OPPIDUM_VICTORY_THRESHOLD") {
            if let Ok(threshold) = val.parse::<f64>() {
                game.combat.victory_threshold = threshold.max(1.0);
            }
        }

        if let Ok(val) = env::var("OPPIDUM_LOOT_FRACTION") {
            if let Ok(fraction) = val.parse::<f64>() {
                game.combat.loot_fraction = fraction.clamp(0.0, 1.0);
            }
        }

        let max_conflict_retries = match env::var("OPPIDUM_CONFLICT_RETRIES") {
            Ok(val) => val.parse::<u32>().unwrap_or(3),
            Err(_) => 3,
        };

        Self {
            game,
            max_conflict_retries,
        }
    }
}
