use tracing::{info, instrument};

use oppidum_types::{
    errors::{ApplicationError, GameError},
    market::{OfferType, TradeResult},
};

use crate::{
    completion::settle_due_entries,
    cqrs::{CommandHandler, HandlerContext, commands::AcceptMarketOffer},
    events::DomainEvent,
    uow::UnitOfWork,
};

pub struct AcceptMarketOfferCommandHandler {}

impl Default for AcceptMarketOfferCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceptMarketOfferCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

/// Fills an offer and moves both legs of the trade. Every mutation stays
/// local until the final saves, so a failed debit on either side leaves
/// nothing behind once the transaction rolls back.
#[async_trait::async_trait]
impl CommandHandler<AcceptMarketOffer> for AcceptMarketOfferCommandHandler {
    #[instrument(skip_all, fields(
        offer_id = %command.offer_id,
        village_id = %command.village_id,
        amount = command.amount,
    ))]
    async fn handle(
        &self,
        command: AcceptMarketOffer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<TradeResult, ApplicationError> {
        let village_repo = uow.villages();
        let market_repo = uow.market();
        let now = ctx.clock.now();

        let mut offer = market_repo.get_by_id(command.offer_id).await?;

        let mut acceptor_village = village_repo.get_by_id(command.village_id).await?;
        if acceptor_village.player_id != command.player_id {
            return Err(GameError::VillageNotOwned {
                village_id: command.village_id,
                player_id: command.player_id,
            }
            .into());
        }
        let mut owner_village = village_repo.get_by_id(offer.village_id).await?;

        settle_due_entries(uow, &mut acceptor_village, now, ctx).await?;
        settle_due_entries(uow, &mut owner_village, now, ctx).await?;

        let (settlement, completed) = offer.fill(command.player_id, command.amount)?;
        let payment = offer.payment_resource();

        match offer.offer_type {
            OfferType::Sell => {
                // the goods already sit in escrow; the acceptor only pays
                acceptor_village.debit_resource(payment, settlement)?;
                acceptor_village.credit_resource(offer.resource, command.amount);
                owner_village.credit_resource(payment, settlement);
            }
            OfferType::Buy => {
                // nothing in escrow; both sides pay live
                acceptor_village.debit_resource(offer.resource, command.amount)?;
                owner_village.debit_resource(payment, settlement)?;
                acceptor_village.credit_resource(payment, settlement);
                owner_village.credit_resource(offer.resource, command.amount);
            }
        }

        market_repo.save(&offer).await?;
        village_repo.save(&acceptor_village).await?;
        village_repo.save(&owner_village).await?;

        ctx.events.publish(DomainEvent::OfferSettled {
            offer_id: offer.id,
            amount: command.amount,
            settlement,
            payment_resource: payment,
        });

        info!(
            accepted = command.amount,
            settlement,
            completed,
            "Market offer accepted"
        );

        Ok(TradeResult {
            offer_id: offer.id,
            accepted_amount: command.amount,
            settlement_amount: settlement,
            payment_resource: payment,
            remaining_amount: offer.remaining_amount(),
            offer_completed: completed,
        })
    }
}
