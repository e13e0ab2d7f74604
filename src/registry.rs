use std::rc::Rc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::config::{PoolerConfig, TurnBudget};
use crate::definition::{PoolDefinition, SizePolicy};
use crate::error::{RegistryError, RegistryResult};
use crate::item::{Container, Pooled, PooledItem};
use crate::placement::{Placeable, Pose, Position, Rotation};
use crate::pool::{Pool, Reclaimed};
use crate::prewarm::{PrewarmScheduler, PrewarmStatus, PrewarmSummary};
use crate::template::TemplateSource;

pub type Pools<T> = IndexMap<String, Pool<T>>; // registration order

/*
    The registry is built once from a list of definitions and then lives for
    as long as the host needs pooled items. Every pool gets its own container
    under the registry's root, and every pool flagged for prewarming is
    handed to the scheduler, which the host drives one turn at a time.
*/
pub struct PoolRegistry<T> {
    root: Container,
    pools: Pools<T>,
    scheduler: PrewarmScheduler,
    config: PoolerConfig,
}

impl <T: PooledItem> PoolRegistry<T> {
    pub fn initialize<I, S>(definitions: I, source: S, config: PoolerConfig) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = PoolDefinition>,
        S: TemplateSource<T> + 'static,
    {
        config.validate()?;

        let source: Rc<dyn TemplateSource<T>> = Rc::new(source);
        let root: Container = Container::root(&config.root_container);
        let mut pools: Pools<T> = IndexMap::new();
        for definition in definitions {
            validate_definition(&definition)?;

            match pools.entry(definition.id.clone()) {
                Entry::Occupied(_) => {
                    tracing::error!(pool = %definition.id, "duplicate pool identifier");
                    return Err(RegistryError::DuplicateIdentifier(definition.id))
                },

                Entry::Vacant(entry) => {
                    let mut pool: Pool<T> = Pool::new(&definition, Rc::clone(&source));
                    pool.set_container(root.child(&format!("Pool {}", definition.id)));
                    entry.insert(pool);
                },
            }
        }

        if pools.is_empty() {
            tracing::warn!("there are no pools");
        }

        let scheduler: PrewarmScheduler = PrewarmScheduler::new(
            pools.values()
                .filter(|pool: &&Pool<T>| pool.prewarm())
                .map(|pool| (pool.id(), pool.prewarm_priority())),
            config.progress_log_interval(),
        );

        tracing::debug!(pools = pools.len(), prewarm = scheduler.pending(), "pool registry ready");
        return Ok(Self { root, pools, scheduler, config })
    }

    pub fn root(&self) -> &Container {
        return &self.root
    }

    pub fn config(&self) -> &PoolerConfig {
        return &self.config
    }

    pub fn len(&self) -> usize {
        return self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        return self.pools.is_empty()
    }

    pub fn pool(&self, id: &str) -> Option<&Pool<T>> {
        return self.pools.get(id)
    }

    pub fn pool_ids(&self) -> impl Iterator<Item = &str> {
        return self.pools.keys().map(|id| id.as_str())
    }

    pub fn acquire(&mut self, id: &str) -> Option<Pooled<T>> {
        match self.pools.get_mut(id) {
            Some(pool) => return pool.get(),
            None => {
                tracing::warn!(pool = id, "no pool with this identifier");
                return None
            },
        }
    }

    /// Hands an item back to the pool that created it.
    pub fn release(&mut self, item: Pooled<T>) -> Reclaimed {
        let pool: &mut Pool<T> = match self.pools.get_mut(item.pool_id()) {
            Some(pool) => pool,
            None => {
                tracing::warn!(pool = item.pool_id(), "released item has no pool here, discarding it");
                return Reclaimed::Discarded
            },
        };

        match pool.reclaim(item) {
            Ok(reclaimed) => return reclaimed,
            Err(_) => return Reclaimed::Discarded,
        }
    }

    pub fn prewarm(&self) -> &PrewarmScheduler {
        return &self.scheduler
    }

    /// Runs one prewarm turn with the configured per-turn budget.
    pub fn prewarm_turn(&mut self) -> PrewarmStatus {
        let budget: TurnBudget = self.config.max_creations_per_turn;
        return self.prewarm_turn_with(budget)
    }

    pub fn prewarm_turn_with(&mut self, budget: TurnBudget) -> PrewarmStatus {
        return self.scheduler.advance(&mut self.pools, budget)
    }

    /// Keeps taking turns until every prewarm pool reached its initial size.
    pub fn prewarm_to_completion(&mut self) -> PrewarmSummary {
        loop {
            if let PrewarmStatus::Done(summary) = self.prewarm_turn() {
                return summary
            }
        }
    }
}

impl <T: Placeable> PoolRegistry<T> {
    /// Acquires an item and moves it under `parent`, optionally snapping it
    /// to the parent's origin.
    pub fn acquire_into(&mut self, id: &str, parent: &Container, reset_transform: bool) -> Option<Pooled<T>> {
        let mut item: Pooled<T> = self.acquire(id)?;
        item.set_parent(parent);
        if reset_transform {
            item.set_local_pose(Pose::IDENTITY);
        }
        return Some(item)
    }

    pub fn acquire_at(&mut self, id: &str, position: Position, rotation: Rotation) -> Option<Pooled<T>> {
        let mut item: Pooled<T> = self.acquire(id)?;
        item.set_position(position);
        item.set_rotation(rotation);
        return Some(item)
    }

    pub fn acquire_at_position(&mut self, id: &str, position: Position) -> Option<Pooled<T>> {
        let mut item: Pooled<T> = self.acquire(id)?;
        item.set_position(position);
        return Some(item)
    }
}

fn validate_definition(definition: &PoolDefinition) -> RegistryResult<()> {
    if definition.id.is_empty() {
        return Err(RegistryError::EmptyIdentifier)
    }

    let exceeds: bool = definition.size_policy == SizePolicy::Fixed && definition.initial_size > definition.maximum_size;
    if exceeds {
        return Err(RegistryError::InitialExceedsMaximum {
            id: definition.id.clone(),
            initial_size: definition.initial_size,
            maximum_size: definition.maximum_size,
        })
    }

    return Ok(())
}
