use tracing::{info, instrument};

use oppidum_types::{errors::ApplicationError, market::OfferType};

use crate::{
    cqrs::{CommandHandler, HandlerContext, commands::CancelMarketOffer},
    uow::UnitOfWork,
};

pub struct CancelMarketOfferCommandHandler {}

impl Default for CancelMarketOfferCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelMarketOfferCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<CancelMarketOffer> for CancelMarketOfferCommandHandler {
    #[instrument(skip_all, fields(offer_id = %command.offer_id))]
    async fn handle(
        &self,
        command: CancelMarketOffer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<(), ApplicationError> {
        let market_repo = uow.market();
        let village_repo = uow.villages();

        let mut offer = market_repo.get_by_id(command.offer_id).await?;
        let remaining = offer.cancel(command.player_id)?;

        // only sell offers hold escrow to give back
        if offer.offer_type == OfferType::Sell && remaining > 0 {
            let mut village = village_repo.get_by_id(offer.village_id).await?;
            village.credit_resource(offer.resource, remaining);
            village_repo.save(&village).await?;
        }

        market_repo.save(&offer).await?;

        info!(remaining, "Market offer cancelled");
        Ok(())
    }
}
