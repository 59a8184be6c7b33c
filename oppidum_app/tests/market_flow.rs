use std::sync::Arc;

use chrono::Utc;

use oppidum_app::{
    app_bus::AppBus,
    command_handlers::{
        accept_market_offer::AcceptMarketOfferCommandHandler,
        cancel_market_offer::CancelMarketOfferCommandHandler,
        create_market_offer::CreateMarketOfferCommandHandler,
    },
    config::Config,
    cqrs::{
        commands::{AcceptMarketOffer, CancelMarketOffer, CreateMarketOffer},
        queries::ListMarketOffers,
    },
    events::NoopEventSink,
    queries_handlers::list_market_offers::ListMarketOffersHandler,
    test_utils::tests::{ManualClock, MockUnitOfWorkProvider},
    uow::UnitOfWork,
};
use oppidum_game::{
    config::GameConfig,
    test_utils::{PlayerFactoryOptions, VillageFactoryOptions, player_factory, village_factory},
};
use oppidum_types::{
    common::{Resource, ResourceBundle},
    errors::Result,
    market::OfferType,
};

fn bus_at(provider: Arc<MockUnitOfWorkProvider>, clock: ManualClock) -> AppBus {
    let config = Config {
        game: GameConfig::default(),
        max_conflict_retries: 3,
    };
    AppBus::with_services(
        Arc::new(config),
        provider,
        Arc::new(clock),
        Arc::new(NoopEventSink::new()),
    )
}

/// A sell offer filled in two bites: goods leave escrow, payment flows at
/// the posted rate, and the drained offer disappears from the listing.
#[tokio::test]
async fn test_full_trade_flow() -> Result<()> {
    let start = Utc::now();
    let provider = Arc::new(MockUnitOfWorkProvider::new());
    let bus = bus_at(provider.clone(), ManualClock::at(start));

    let seller = player_factory(PlayerFactoryOptions::default());
    let buyer = player_factory(PlayerFactoryOptions::default());
    let seller_village = village_factory(VillageFactoryOptions {
        player_id: Some(seller.id),
        updated_at: Some(start),
        ..Default::default()
    });
    let buyer_village = village_factory(VillageFactoryOptions {
        player_id: Some(buyer.id),
        balance: Some(ResourceBundle::new(1500, 1500, 1500, 1500)),
        updated_at: Some(start),
        ..Default::default()
    });
    provider.repos().players().save(&seller).await?;
    provider.repos().players().save(&buyer).await?;
    provider.repos().villages().save(&seller_village).await?;
    provider.repos().villages().save(&buyer_village).await?;

    // 300 wood on sale at 1.5; wood is paid for in clay
    let offer = bus
        .execute(
            CreateMarketOffer {
                player_id: seller.id,
                village_id: seller_village.id,
                offer_type: OfferType::Sell,
                resource: Resource::Wood,
                amount: 300,
                exchange_rate: 1.5,
            },
            CreateMarketOfferCommandHandler::new(),
        )
        .await?;

    assert_eq!(offer.payment_resource(), Resource::Clay);
    let stored = provider
        .repos()
        .villages()
        .get_by_id(seller_village.id)
        .await?;
    assert_eq!(
        stored.balance().wood,
        500,
        "A sell offer escrows the goods up front"
    );

    // first bite: 120 wood for 180 clay
    let trade = bus
        .execute(
            AcceptMarketOffer {
                player_id: buyer.id,
                village_id: buyer_village.id,
                offer_id: offer.id,
                amount: 120,
            },
            AcceptMarketOfferCommandHandler::new(),
        )
        .await?;
    assert_eq!(trade.accepted_amount, 120);
    assert_eq!(trade.settlement_amount, 180);
    assert_eq!(trade.payment_resource, Resource::Clay);
    assert_eq!(trade.remaining_amount, 180);
    assert!(!trade.offer_completed);

    let open = bus
        .query(ListMarketOffers {}, ListMarketOffersHandler::new())
        .await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].remaining_amount(), 180);

    // second bite drains the offer: 180 wood for 270 clay
    let trade = bus
        .execute(
            AcceptMarketOffer {
                player_id: buyer.id,
                village_id: buyer_village.id,
                offer_id: offer.id,
                amount: 180,
            },
            AcceptMarketOfferCommandHandler::new(),
        )
        .await?;
    assert!(trade.offer_completed);
    assert_eq!(trade.remaining_amount, 0);

    let open = bus
        .query(ListMarketOffers {}, ListMarketOffersHandler::new())
        .await?;
    assert!(open.is_empty(), "A drained offer leaves the listing");

    let stored_seller = provider
        .repos()
        .villages()
        .get_by_id(seller_village.id)
        .await?;
    let stored_buyer = provider
        .repos()
        .villages()
        .get_by_id(buyer_village.id)
        .await?;
    assert_eq!(
        stored_seller.balance(),
        ResourceBundle::new(500, 1250, 800, 800)
    );
    assert_eq!(
        stored_buyer.balance(),
        ResourceBundle::new(1800, 1050, 1500, 1500)
    );
    assert_eq!(
        stored_seller.balance().clay + stored_buyer.balance().clay,
        800 + 1500,
        "The clay merely changed hands"
    );
    Ok(())
}

#[tokio::test]
async fn test_cancelled_offer_returns_the_unfilled_escrow() -> Result<()> {
    let start = Utc::now();
    let provider = Arc::new(MockUnitOfWorkProvider::new());
    let bus = bus_at(provider.clone(), ManualClock::at(start));

    let seller = player_factory(PlayerFactoryOptions::default());
    let buyer = player_factory(PlayerFactoryOptions::default());
    let seller_village = village_factory(VillageFactoryOptions {
        player_id: Some(seller.id),
        updated_at: Some(start),
        ..Default::default()
    });
    let buyer_village = village_factory(VillageFactoryOptions {
        player_id: Some(buyer.id),
        updated_at: Some(start),
        ..Default::default()
    });
    provider.repos().players().save(&seller).await?;
    provider.repos().players().save(&buyer).await?;
    provider.repos().villages().save(&seller_village).await?;
    provider.repos().villages().save(&buyer_village).await?;

    // 400 iron at par; iron is paid for in crop
    let offer = bus
        .execute(
            CreateMarketOffer {
                player_id: seller.id,
                village_id: seller_village.id,
                offer_type: OfferType::Sell,
                resource: Resource::Iron,
                amount: 400,
                exchange_rate: 1.0,
            },
            CreateMarketOfferCommandHandler::new(),
        )
        .await?;

    bus.execute(
        AcceptMarketOffer {
            player_id: buyer.id,
            village_id: buyer_village.id,
            offer_id: offer.id,
            amount: 150,
        },
        AcceptMarketOfferCommandHandler::new(),
    )
    .await?;

    bus.execute(
        CancelMarketOffer {
            player_id: seller.id,
            offer_id: offer.id,
        },
        CancelMarketOfferCommandHandler::new(),
    )
    .await?;

    let open = bus
        .query(ListMarketOffers {}, ListMarketOffersHandler::new())
        .await?;
    assert!(open.is_empty());

    let stored_seller = provider
        .repos()
        .villages()
        .get_by_id(seller_village.id)
        .await?;
    let stored_buyer = provider
        .repos()
        .villages()
        .get_by_id(buyer_village.id)
        .await?;
    // 150 of the 400 escrowed iron sold; the other 250 came home
    assert_eq!(
        stored_seller.balance(),
        ResourceBundle::new(800, 800, 650, 950)
    );
    assert_eq!(
        stored_buyer.balance(),
        ResourceBundle::new(800, 800, 950, 650)
    );
    assert_eq!(
        stored_seller.balance().iron + stored_buyer.balance().iron,
        800 + 800,
        "No iron was minted or burned"
    );
    Ok(())
}
