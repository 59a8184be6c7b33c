use uuid::Uuid;

use oppidum_game::models::{
    alliance::Alliance, battle::Battle, market::MarketOffer, queue::QueueEntry, war::War,
};
use oppidum_types::{
    army::{TroopSet, UnitKind},
    common::{Resource, ResourceBundle},
    market::{OfferType, TradeResult},
};

use crate::cqrs::Command;

#[derive(Debug, Clone)]
pub struct UpgradeBuilding {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub slot_id: u8,
}

impl Command for UpgradeBuilding {
    type Output = QueueEntry;
}

#[derive(Debug, Clone)]
pub struct TrainUnits {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub unit: UnitKind,
    pub quantity: u32,
}

impl Command for TrainUnits {
    type Output = QueueEntry;
}

/// Cancels an active queue entry and refunds part of its cost.
#[derive(Debug, Clone)]
pub struct CancelQueueEntry {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub entry_id: Uuid,
}

impl Command for CancelQueueEntry {
    type Output = ResourceBundle;
}

/// Sends troops against another village. The battle resolves immediately.
#[derive(Debug, Clone)]
pub struct AttackVillage {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub target_village_id: Uuid,
    pub units: TroopSet,
}

impl Command for AttackVillage {
    type Output = Battle;
}

#[derive(Debug, Clone)]
pub struct CreateMarketOffer {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub offer_type: OfferType,
    pub resource: Resource,
    pub amount: u64,
    pub exchange_rate: f64,
}

impl Command for CreateMarketOffer {
    type Output = MarketOffer;
}

/// Fills an active offer, fully or in part, from the acceptor's village.
#[derive(Debug, Clone)]
pub struct AcceptMarketOffer {
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub offer_id: Uuid,
    pub amount: u64,
}

impl Command for AcceptMarketOffer {
    type Output = TradeResult;
}

#[derive(Debug, Clone)]
pub struct CancelMarketOffer {
    pub player_id: Uuid,
    pub offer_id: Uuid,
}

impl Command for CancelMarketOffer {
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct CreateAlliance {
    pub player_id: Uuid,
    pub name: String,
    pub tag: String,
}

impl Command for CreateAlliance {
    type Output = Alliance;
}

#[derive(Debug, Clone)]
pub struct JoinAlliance {
    pub player_id: Uuid,
    pub alliance_id: Uuid,
}

impl Command for JoinAlliance {
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct LeaveAlliance {
    pub player_id: Uuid,
}

impl Command for LeaveAlliance {
    type Output = ();
}

/// Dissolves an alliance: members are released and any war it is part of
/// is force-ended.
#[derive(Debug, Clone)]
pub struct DisbandAlliance {
    pub player_id: Uuid,
    pub alliance_id: Uuid,
}

impl Command for DisbandAlliance {
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct DeclareWar {
    pub player_id: Uuid,
    pub attacker_alliance_id: Uuid,
    pub defender_alliance_id: Uuid,
}

impl Command for DeclareWar {
    type Output = War;
}

#[derive(Debug, Clone)]
pub struct AcceptWar {
    pub player_id: Uuid,
    pub war_id: Uuid,
}

impl Command for AcceptWar {
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct EndWar {
    pub player_id: Uuid,
    pub war_id: Uuid,
}

impl Command for EndWar {
    type Output = ();
}
