use async_trait::async_trait;

use oppidum_types::errors::ApplicationError;

use crate::{
    cqrs::{HandlerContext, Query, QueryHandler, queries::ListMarketOffers},
    uow::UnitOfWork,
};

pub struct ListMarketOffersHandler {}

impl ListMarketOffersHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<ListMarketOffers> for ListMarketOffersHandler {
    async fn handle(
        &self,
        _query: ListMarketOffers,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _ctx: &HandlerContext,
    ) -> Result<<ListMarketOffers as Query>::Output, ApplicationError> {
        uow.market().list_active().await
    }
}
