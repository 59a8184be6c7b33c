use thiserror::Error;

/// Errors for app logic.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Gave up after {attempts} conflicting attempts")]
    ConflictRetriesExhausted { attempts: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
