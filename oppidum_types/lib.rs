pub mod army;
pub mod battle;
pub mod buildings;
pub mod common;
pub mod diplomacy;
pub mod errors;
pub mod market;
pub mod queue;

pub use errors::Result;
