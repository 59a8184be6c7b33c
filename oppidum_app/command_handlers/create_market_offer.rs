use tracing::{info, instrument};

use oppidum_game::models::market::MarketOffer;
use oppidum_types::{
    errors::{ApplicationError, GameError},
    market::OfferType,
};

use crate::{
    completion::settle_due_entries,
    cqrs::{CommandHandler, HandlerContext, commands::CreateMarketOffer},
    uow::UnitOfWork,
};

pub struct CreateMarketOfferCommandHandler {}

impl Default for CreateMarketOfferCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateMarketOfferCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<CreateMarketOffer> for CreateMarketOfferCommandHandler {
    #[instrument(skip_all, fields(
        village_id = %command.village_id,
        resource = %command.resource,
        amount = command.amount,
    ))]
    async fn handle(
        &self,
        command: CreateMarketOffer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        ctx: &HandlerContext,
    ) -> Result<MarketOffer, ApplicationError> {
        let village_repo = uow.villages();
        let market_repo = uow.market();
        let now = ctx.clock.now();

        let mut village = village_repo.get_by_id(command.village_id).await?;
        if village.player_id != command.player_id {
            return Err(GameError::VillageNotOwned {
                village_id: command.village_id,
                player_id: command.player_id,
            }
            .into());
        }

        settle_due_entries(uow, &mut village, now, ctx).await?;

        let offer = MarketOffer::new(
            command.player_id,
            command.village_id,
            command.offer_type,
            command.resource,
            command.amount,
            command.exchange_rate,
            now,
        )?;

        // Sell offers set the goods aside up front; buy offers hold nothing
        // and pay on each fill instead.
        if offer.offer_type == OfferType::Sell {
            village.debit_resource(offer.resource, offer.amount)?;
        }

        village_repo.save(&village).await?;
        market_repo.add(&offer).await?;

        info!(
            offer_id = %offer.id,
            rate = offer.exchange_rate,
            "Market offer listed"
        );

        Ok(offer)
    }
}
