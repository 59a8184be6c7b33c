pub mod accept_market_offer;
pub mod accept_war;
pub mod attack_village;
pub mod cancel_market_offer;
pub mod cancel_queue_entry;
pub mod create_alliance;
pub mod create_market_offer;
pub mod declare_war;
pub mod disband_alliance;
pub mod end_war;
pub mod join_alliance;
pub mod leave_alliance;
pub mod train_units;
pub mod upgrade_building;
