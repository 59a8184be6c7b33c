pub mod alliance;
pub mod army;
pub mod battle;
pub mod market;
pub mod player;
pub mod queue;
pub mod village;
pub mod war;
