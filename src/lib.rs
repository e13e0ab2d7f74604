mod config;
mod definition;
mod error;
mod item;
mod placement;
mod pool;
mod prewarm;
mod registry;
mod template;

#[cfg(test)]
mod testing;

pub use config::{PoolerConfig, TurnBudget, DEFAULT_MAX_CREATIONS_PER_TURN};
pub use definition::{PoolDefinition, SizePolicy};
pub use error::{ConfigError, RegistryError, RegistryResult};
pub use item::{Container, ItemId, Pooled, PooledItem};
pub use placement::{Placeable, Pose, Position, Rotation, NO_ROTATION, ORIGIN};
pub use pool::{Pool, Reclaimed};
pub use prewarm::{PrewarmScheduler, PrewarmStatus, PrewarmSummary};
pub use registry::{PoolRegistry, Pools};
pub use template::{Template, TemplateLibrary, TemplateSource};
