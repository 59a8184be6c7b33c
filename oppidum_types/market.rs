use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferType {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Active,
    Completed,
    Cancelled,
}

impl OfferStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, OfferStatus::Active)
    }
}

/// Outcome of a (possibly partial) offer acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResult {
    pub offer_id: Uuid,
    pub accepted_amount: u64,
    pub settlement_amount: u64,
    pub payment_resource: Resource,
    pub remaining_amount: u64,
    pub offer_completed: bool,
}
