use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use oppidum_types::{army::TroopSet, common::ResourceBundle};

use crate::config::GameConfig;

use super::models::{alliance::Alliance, player::Player, village::Village, war::War};

#[derive(Default, Clone)]
pub struct PlayerFactoryOptions<'a> {
    pub id: Option<Uuid>,
    pub username: Option<&'a str>,
    pub alliance_id: Option<Uuid>,
    pub points: Option<u64>,
}

#[derive(Default, Clone)]
pub struct VillageFactoryOptions {
    pub name: Option<String>,
    pub player_id: Option<Uuid>,
    pub balance: Option<ResourceBundle>,
    pub units: Option<TroopSet>,
    pub updated_at: Option<DateTime<Utc>>,
    pub config: Option<GameConfig>,
}

#[derive(Default, Clone)]
pub struct AllianceFactoryOptions<'a> {
    pub name: Option<&'a str>,
    pub tag: Option<&'a str>,
}

#[derive(Default, Clone)]
pub struct WarFactoryOptions {
    pub attacker_alliance_id: Option<Uuid>,
    pub defender_alliance_id: Option<Uuid>,
    pub accepted: Option<bool>,
    pub declared_at: Option<DateTime<Utc>>,
}

pub fn player_factory(options: PlayerFactoryOptions) -> Player {
    let default_username: String = format!("player_{}", rand::thread_rng().r#gen::<u32>());
    Player::from_persistence(
        options.id.unwrap_or_else(Uuid::new_v4),
        options.username.map_or(default_username, |s| s.to_string()),
        options.alliance_id,
        options.points.unwrap_or(0),
    )
}

pub fn village_factory(options: VillageFactoryOptions) -> Village {
    let config = options.config.unwrap_or_default();
    let mut village = Village::new(
        options.name.unwrap_or("Factory Village".to_string()),
        options.player_id.unwrap_or_else(Uuid::new_v4),
        &config,
        options.updated_at.unwrap_or_else(Utc::now),
    );

    if let Some(balance) = options.balance {
        village.set_stocks_for_test(balance);
    }
    if let Some(units) = options.units {
        village.set_units_for_test(&units, &config);
    }

    village
}

pub fn alliance_factory(options: AllianceFactoryOptions) -> Alliance {
    let default_name: String = format!("alliance_{}", rand::thread_rng().r#gen::<u32>());
    Alliance::new(
        options.name.map_or(default_name, |s| s.to_string()),
        options.tag.unwrap_or("TAG").to_string(),
    )
}

pub fn war_factory(options: WarFactoryOptions) -> War {
    let declared_at = options.declared_at.unwrap_or_else(Utc::now);
    let mut war = War::new(
        options.attacker_alliance_id.unwrap_or_else(Uuid::new_v4),
        options.defender_alliance_id.unwrap_or_else(Uuid::new_v4),
        declared_at,
    )
    .expect("factory alliances are distinct");

    if options.accepted.unwrap_or(false) {
        war.accept(declared_at).expect("factory war starts proposed");
    }

    war
}
