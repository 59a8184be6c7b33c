use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::{
    common::Resource,
    errors::GameError,
    market::{OfferStatus, OfferType},
};

/// A standing order on the market. Sell offers escrow their goods at
/// creation; buy offers promise payment on each fill instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOffer {
    pub id: Uuid,
    pub player_id: Uuid,
    pub village_id: Uuid,
    pub offer_type: OfferType,
    pub resource: Resource,
    pub amount: u64,
    remaining_amount: u64,
    pub exchange_rate: f64,
    status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

impl MarketOffer {
    pub fn new(
        player_id: Uuid,
        village_id: Uuid,
        offer_type: OfferType,
        resource: Resource,
        amount: u64,
        exchange_rate: f64,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        if amount == 0 || !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            return Err(GameError::InvalidMarketOffer);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            player_id,
            village_id,
            offer_type,
            resource,
            amount,
            remaining_amount: amount,
            exchange_rate,
            status: OfferStatus::Active,
            created_at: now,
        })
    }

    /// Constructor for re-hydrating a MarketOffer from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        player_id: Uuid,
        village_id: Uuid,
        offer_type: OfferType,
        resource: Resource,
        amount: u64,
        remaining_amount: u64,
        exchange_rate: f64,
        status: OfferStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            player_id,
            village_id,
            offer_type,
            resource,
            amount,
            remaining_amount,
            exchange_rate,
            status,
            created_at,
        }
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    pub fn remaining_amount(&self) -> u64 {
        self.remaining_amount
    }

    /// The resource the acceptor settles in.
    pub fn payment_resource(&self) -> Resource {
        self.resource.payment_resource()
    }

    /// What an accepted amount converts to at this offer's rate.
    pub fn settlement_amount(&self, accepted: u64) -> u64 {
        (accepted as f64 * self.exchange_rate).floor() as u64
    }

    /// Fills part (or all) of the offer. Returns the settlement owed in the
    /// payment resource and whether the fill exhausted the offer.
    pub fn fill(&mut self, acceptor_id: Uuid, amount: u64) -> Result<(u64, bool), GameError> {
        if !self.status.is_active() {
            return Err(GameError::OfferNotActive(self.id));
        }
        if acceptor_id == self.player_id {
            return Err(GameError::SelfTradeRejected);
        }
        if amount == 0 {
            return Err(GameError::InvalidMarketOffer);
        }
        if amount > self.remaining_amount {
            return Err(GameError::OfferAmountExceeded {
                requested: amount,
                remaining: self.remaining_amount,
            });
        }

        self.remaining_amount -= amount;
        let completed = self.remaining_amount == 0;
        if completed {
            self.status = OfferStatus::Completed;
        }

        Ok((self.settlement_amount(amount), completed))
    }

    /// Withdraws the offer. Returns the unfilled amount so the caller can
    /// release any escrow still held.
    pub fn cancel(&mut self, player_id: Uuid) -> Result<u64, GameError> {
        if self.player_id != player_id {
            return Err(GameError::NotOfferOwner {
                offer_id: self.id,
                player_id,
            });
        }
        if !self.status.is_active() {
            return Err(GameError::OfferNotActive(self.id));
        }

        self.status = OfferStatus::Cancelled;
        Ok(self.remaining_amount)
    }
}
