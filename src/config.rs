use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_MAX_CREATIONS_PER_TURN: usize = 388;
pub const DEFAULT_PROGRESS_LOG_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_ROOT_CONTAINER: &str = "ObjectsPooler";

/// How many items the prewarm scheduler may create in a single turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnBudget {
    Limited(usize),
    /// No throttling: every pool is drained in the first turn.
    Unbounded,
}

impl TurnBudget {
    pub(crate) fn limit(self) -> Option<usize> {
        match self {
            TurnBudget::Limited(limit) => return Some(limit),
            TurnBudget::Unbounded => return None,
        }
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        return TurnBudget::Limited(DEFAULT_MAX_CREATIONS_PER_TURN)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolerConfig {
    pub max_creations_per_turn: TurnBudget,
    /// Prewarm progress is logged at most once per interval. Zero logs every turn.
    pub progress_log_interval_ms: u64,
    pub root_container: String,
}

impl PoolerConfig {
    pub fn progress_log_interval(&self) -> Duration {
        return Duration::from_millis(self.progress_log_interval_ms)
    }

    pub fn with_turn_budget(mut self, budget: TurnBudget) -> Self {
        self.max_creations_per_turn = budget;
        return self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_creations_per_turn == TurnBudget::Limited(0) {
            return Err(ConfigError::ZeroTurnBudget)
        }

        if self.root_container.is_empty() {
            return Err(ConfigError::EmptyRootContainer)
        }

        return Ok(())
    }
}

impl Default for PoolerConfig {
    fn default() -> Self {
        return Self {
            max_creations_per_turn: TurnBudget::default(),
            progress_log_interval_ms: DEFAULT_PROGRESS_LOG_INTERVAL_MS,
            root_container: DEFAULT_ROOT_CONTAINER.to_owned(),
        }
    }
}
