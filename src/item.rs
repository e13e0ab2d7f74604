use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/*
    Anything handed out by a pool has to be able to come back to life after
    it has been parked. The pool never destroys an item on its own when the
    item is done; the owner hands the item back (PoolRegistry::release or
    Pool::reclaim) and the pool decides whether it gets recycled or dropped.
*/
pub trait PooledItem {
    /// Brings a parked item back to a ready-for-reuse, active state.
    fn reset_state(&mut self);

    /// Called when the item is parked in the idle queue.
    fn deactivate(&mut self);

    fn attach_to(&mut self, _container: &Container) {}
}

impl <I: PooledItem + ?Sized> PooledItem for Box<I> {
    fn reset_state(&mut self) {
        (**self).reset_state();
    }

    fn deactivate(&mut self) {
        (**self).deactivate();
    }

    fn attach_to(&mut self, container: &Container) {
        (**self).attach_to(container);
    }
}

// Grouping handle that idle and freshly created items are parked under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Container {
    path: String,
}

impl Container {
    pub fn root(name: &str) -> Self {
        return Self { path: name.to_owned() }
    }

    pub fn child(&self, name: &str) -> Self {
        return Self { path: format!("{}/{}", self.path, name) }
    }

    pub fn path(&self) -> &str {
        return &self.path
    }

    pub fn name(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((_, name)) => return name,
            None => return &self.path,
        }
    }

    pub fn is_within(&self, ancestor: &Container) -> bool {
        return self.path.len() > ancestor.path.len()
            && self.path.starts_with(&ancestor.path)
            && self.path[ancestor.path.len()..].starts_with('/')
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.path)
    }
}

// Serial number of an item within its pool, assigned at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "#{}", self.0)
    }
}

/// An item together with the identity of the pool that created it.
///
/// The owning pool is stamped once at creation and can never change, so an
/// item released to a registry always finds its way home.
pub struct Pooled<T> {
    item: T,
    pool: Rc<str>,
    id: ItemId,
}

impl <T> Pooled<T> {
    pub(crate) fn new(item: T, pool: Rc<str>, id: ItemId) -> Self {
        return Self { item, pool, id }
    }

    pub fn pool_id(&self) -> &str {
        return &self.pool
    }

    pub fn item_id(&self) -> ItemId {
        return self.id
    }

    /// Takes the item out of pooling for good.
    pub fn into_inner(self) -> T {
        return self.item
    }
}

impl <T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        return &self.item
    }
}

impl <T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        return &mut self.item
    }
}

impl <T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_struct("Pooled")
            .field("pool", &&*self.pool)
            .field("id", &self.id)
            .field("item", &self.item)
            .finish()
    }
}
