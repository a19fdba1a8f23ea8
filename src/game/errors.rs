use thiserror::Error;

/// Errors that can arise while resolving player actions or touching the
/// game storage layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// A weighted table was built empty or with a zero total weight.
    /// This is a catalog configuration bug, never a tolerable runtime state.
    #[error("invalid probability table: {0}")]
    InvalidTable(&'static str),

    /// Dispatcher-argument validation failure, re-checked by the engine.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] crate::validation::ValidationError),

    /// Opening a sealed container without the key consumable.
    #[error("sealed container requires a golden key")]
    MissingKey,

    /// A choice outside the session's legal set.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Activity name the engine does not know.
    #[error("unknown activity: {0}")]
    UnknownActivity(String),

    /// Actor balance below the stake or cost. Nothing was mutated.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    /// Inventory at capacity and no replacement was chosen.
    #[error("inventory full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    /// The action is still cooling down.
    #[error("cooldown active: {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: i64 },

    /// A live session already exists for this (owner, flow) pair.
    #[error("session already open for {owner}")]
    SessionAlreadyOpen { owner: String },

    /// No encounter is active for the given scope.
    #[error("no active encounter: {0}")]
    NoActiveEncounter(String),

    /// Attack submitted against an encounter that already resolved.
    #[error("encounter already resolved")]
    EncounterResolved,

    /// Internal error (task join errors, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
