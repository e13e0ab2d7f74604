use std::collections::VecDeque;
use std::rc::Rc;

use crate::definition::{PoolDefinition, SizePolicy};
use crate::item::{Container, ItemId, Pooled, PooledItem};
use crate::template::{Template, TemplateSource, TemplateState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reclaimed {
    /// Parked at the back of the idle queue.
    Recycled,
    /// Dropped because a fixed pool was already full.
    Discarded,
}

pub struct Pool<T> {
    id: Rc<str>,
    factory_path: String,
    size_policy: SizePolicy,
    initial_size: usize,
    maximum_size: usize,
    prewarm: bool,
    prewarm_priority: i32,

    idle: VecDeque<Pooled<T>>, // oldest returned item at the front
    template: TemplateState<T>,
    source: Rc<dyn TemplateSource<T>>,
    container: Container,
    num_created: u64, // doubles as the next item id
}

impl <T: PooledItem> Pool<T> {
    pub fn new(definition: &PoolDefinition, source: Rc<dyn TemplateSource<T>>) -> Self {
        let container: Container = Container::root(&format!("Pool {}", definition.id));
        return Self {
            id: Rc::from(definition.id.as_str()),
            factory_path: definition.factory_path.clone(),
            size_policy: definition.size_policy,
            initial_size: definition.initial_size,
            maximum_size: definition.maximum_size,
            prewarm: definition.prewarm,
            prewarm_priority: definition.prewarm_priority,

            idle: VecDeque::new(),
            template: TemplateState::Unresolved,
            source,
            container,
            num_created: 0,
        }
    }

    pub fn id(&self) -> &str {
        return &self.id
    }

    pub fn factory_path(&self) -> &str {
        return &self.factory_path
    }

    pub fn size_policy(&self) -> SizePolicy {
        return self.size_policy
    }

    pub fn initial_size(&self) -> usize {
        return self.initial_size
    }

    pub fn maximum_size(&self) -> usize {
        return self.maximum_size
    }

    pub fn prewarm(&self) -> bool {
        return self.prewarm
    }

    pub fn prewarm_priority(&self) -> i32 {
        return self.prewarm_priority
    }

    pub fn idle_count(&self) -> usize {
        return self.idle.len()
    }

    pub fn created_count(&self) -> u64 {
        return self.num_created
    }

    pub fn container(&self) -> &Container {
        return &self.container
    }

    pub fn is_resolved(&self) -> bool {
        return matches!(self.template, TemplateState::Resolved(_))
    }

    pub fn set_container(&mut self, container: Container) {
        self.container = container;
    }

    pub fn get(&mut self) -> Option<Pooled<T>> {
        if let Some(mut item) = self.idle.pop_front() {
            item.reset_state();
            return Some(item)
        }

        return self.create_new()
    }

    pub fn create_new(&mut self) -> Option<Pooled<T>> {
        let template: Rc<dyn Template<T>> = self.resolve_template()?;
        let item: T = template.instantiate(&self.container);
        let id: ItemId = ItemId(self.num_created);
        self.num_created += 1;
        return Some(Pooled::new(item, Rc::clone(&self.id), id))
    }

    /// Takes back an item whose owner is done with it. Items stamped by a
    /// different pool are handed straight back.
    pub fn reclaim(&mut self, item: Pooled<T>) -> Result<Reclaimed, Pooled<T>> {
        if item.pool_id() != self.id() {
            tracing::warn!(pool = %self.id, owner = item.pool_id(), "refusing an item created by another pool");
            return Err(item)
        }

        return Ok(self.park(item))
    }

    pub fn is_full(&self) -> bool {
        return self.size_policy == SizePolicy::Fixed && self.idle.len() >= self.maximum_size
    }

    // Used by prewarming: make a new item and park it straight away. Nothing
    // is created once a fixed pool is full.
    pub(crate) fn create_idle(&mut self) -> bool {
        if self.is_full() {
            return false
        }

        match self.create_new() {
            Some(item) => {
                self.park(item);
                return true
            },

            None => return false,
        }
    }

    fn park(&mut self, mut item: Pooled<T>) -> Reclaimed {
        if self.is_full() {
            tracing::trace!(pool = %self.id, item = %item.item_id(), "pool full, discarding item");
            return Reclaimed::Discarded // item is dropped here
        }

        item.deactivate();
        item.attach_to(&self.container);
        self.idle.push_back(item);
        return Reclaimed::Recycled
    }

    pub(crate) fn try_resolve(&mut self) -> bool {
        return self.resolve_template().is_some()
    }

    fn resolve_template(&mut self) -> Option<Rc<dyn Template<T>>> {
        match &self.template {
            TemplateState::Resolved(template) => return Some(Rc::clone(template)),
            TemplateState::Failed => return None,
            TemplateState::Unresolved => {},
        }

        if self.factory_path.is_empty() {
            tracing::error!(pool = %self.id, "factory path is empty, pool cannot create items");
            self.template = TemplateState::Failed;
            return None
        }

        match self.source.load(&self.factory_path) {
            Some(template) => {
                tracing::debug!(pool = %self.id, path = %self.factory_path, "resolved template");
                self.template = TemplateState::Resolved(Rc::clone(&template));
                return Some(template)
            },

            None => {
                tracing::error!(pool = %self.id, path = %self.factory_path, "could not resolve template, pool cannot create items");
                self.template = TemplateState::Failed;
                return None
            },
        }
    }
}
