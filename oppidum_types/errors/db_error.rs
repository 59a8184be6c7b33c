use thiserror::Error;
use uuid::Uuid;

/// Errors for db stuff.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Village with ID {0} not found")]
    VillageNotFound(Uuid),

    #[error("Player with ID {0} not found")]
    PlayerNotFound(Uuid),

    #[error("Queue entry with ID {0} not found")]
    QueueEntryNotFound(Uuid),

    #[error("Market offer with ID {0} not found")]
    MarketOfferNotFound(Uuid),

    #[error("Alliance with ID {0} not found")]
    AllianceNotFound(Uuid),

    #[error("War with ID {0} not found")]
    WarNotFound(Uuid),

    #[error("Concurrent modification of {entity} {id}")]
    ConcurrentModification { entity: &'static str, id: Uuid },

    #[error("Transaction error: {0}")]
    Transaction(String),
}
