use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{army::UnitKind, battle::BattleResult, common::Resource};

/// Facts the simulation emits after a state change is committed-worthy.
/// Consumers (notifications, projections) subscribe through an `EventSink`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    BuildingCompleted {
        village_id: Uuid,
        slot_id: u8,
        level: u8,
    },
    TrainingCompleted {
        village_id: Uuid,
        unit: UnitKind,
        quantity: u32,
    },
    BattleResolved {
        battle_id: Uuid,
        attacker_village_id: Uuid,
        defender_village_id: Uuid,
        result: BattleResult,
    },
    OfferSettled {
        offer_id: Uuid,
        amount: u64,
        settlement: u64,
        payment_resource: Resource,
    },
}

pub trait EventSink: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

/// Discards everything. The default sink for contexts that do not care.
#[derive(Default)]
pub struct NoopEventSink;

impl NoopEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for NoopEventSink {
    fn publish(&self, _event: DomainEvent) {}
}
