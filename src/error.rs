use thiserror::Error;

/// Failures from the player store. Always surfaced as internal errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt player document: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    // Validation: malformed or out-of-range import data
    #[error("Invalid save data: missing fields [{}]", quoted_list(.0))]
    MissingFields(Vec<String>),

    #[error("Invalid character level")]
    InvalidCharacterLevel,

    #[error("Invalid energy value")]
    InvalidEnergy,

    #[error("Invalid points or upgrade level")]
    InvalidPointsOrUpgradeLevel,

    // Preconditions: the action is well-formed but not allowed right now
    #[error("Not enough energy")]
    InsufficientEnergy,

    #[error("Invalid upgrade level")]
    InvalidUpgradeLevel,

    #[error("Not enough points")]
    InsufficientPoints,

    #[error("Not enough points for advancement")]
    InsufficientPointsForAdvancement,

    #[error("Already at maximum level")]
    MaxLevel,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn quoted_list(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("'{}'", field))
        .collect::<Vec<_>>()
        .join(", ")
}

impl GameError {
    /// True for errors caused by the caller's input or the player's current state.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GameError::Store(_))
    }
}
