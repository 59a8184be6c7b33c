use thiserror::Error;
use uuid::Uuid;

use crate::{army::UnitKind, buildings::BuildingKind, diplomacy::WarStatus};

/// Errors for domain logic (game rules).
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Not enough resources")]
    InsufficientResources,

    #[error("Queue entry {0} is no longer active")]
    InvalidQueueState(Uuid),

    #[error("Queue entry {entry_id} does not belong to village {village_id}")]
    QueueEntryNotOwned { entry_id: Uuid, village_id: Uuid },

    #[error("Slot {slot_id} already has an upgrade in progress")]
    UpgradeInProgress { slot_id: u8 },

    #[error("Training of {unit} is already in progress")]
    TrainingInProgress { unit: UnitKind },

    #[error("Training quantity must be positive")]
    InvalidTrainingQuantity,

    #[error("No buildings found on slot {slot_id}")]
    BuildingNotFound { slot_id: u8 },

    #[error("Building on slot {slot_id} has already reached max level {level}")]
    BuildingAtMaxLevel { slot_id: u8, level: u8 },

    #[error("Village has no {0}")]
    MissingBuilding(BuildingKind),

    #[error("Village {village_id} not owned by player {player_id}")]
    VillageNotOwned { village_id: Uuid, player_id: Uuid },

    #[error("Not enough units available to deploy")]
    NotEnoughTroops,

    #[error("No units selected to deploy")]
    NoTroopsSelected,

    #[error("A village cannot attack itself")]
    SelfAttackRejected,

    #[error("Cannot accept your own offer")]
    SelfTradeRejected,

    #[error("Requested {requested} but only {remaining} left on the offer")]
    OfferAmountExceeded { requested: u64, remaining: u64 },

    #[error("Offer {0} is no longer active")]
    OfferNotActive(Uuid),

    #[error("Offer {offer_id} not owned by player {player_id}")]
    NotOfferOwner { offer_id: Uuid, player_id: Uuid },

    #[error("Invalid market offer")]
    InvalidMarketOffer,

    #[error("Player is already in alliance {0}")]
    AlreadyInAlliance(Uuid),

    #[error("Player {0} is not in an alliance")]
    NotInAlliance(Uuid),

    #[error("Player {player_id} is not a member of alliance {alliance_id}")]
    NotAllianceMember { player_id: Uuid, alliance_id: Uuid },

    #[error("An alliance cannot declare war on itself")]
    SelfWarRejected,

    #[error("A war between these alliances already exists")]
    WarAlreadyExists,

    #[error("Battle participants do not match the alliances of war {war_id}")]
    WarParticipantMismatch { war_id: Uuid },

    #[error("War {war_id} cannot transition from {status:?}")]
    InvalidWarState { war_id: Uuid, status: WarStatus },
}
