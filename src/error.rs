use thiserror::Error;

/// Reasons a registry refuses to be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("pool identifier is empty")]
    EmptyIdentifier,

    /// Two definitions share an identifier; keeping either one would make
    /// later lookups silently wrong.
    #[error("duplicate pool identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("pool {id}: initial size {initial_size} exceeds maximum size {maximum_size}")]
    InitialExceedsMaximum {
        id: String,
        initial_size: usize,
        maximum_size: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("per-turn creation budget must be at least 1 (use Unbounded to disable throttling)")]
    ZeroTurnBudget,

    #[error("root container name is empty")]
    EmptyRootContainer,
}

pub type RegistryResult<T> = Result<T, RegistryError>;
