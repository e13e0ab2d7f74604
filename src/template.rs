use std::collections::HashMap;
use std::rc::Rc;

use crate::item::Container;

/// Blueprint a pool stamps new items out of.
pub trait Template<T> {
    fn instantiate(&self, container: &Container) -> T;
}

impl <T, F: Fn(&Container) -> T> Template<T> for F {
    fn instantiate(&self, container: &Container) -> T {
        return self(container)
    }
}

/// Resolves a pool's factory path into a template. Consulted at most once
/// per pool, whatever the outcome.
pub trait TemplateSource<T> {
    fn load(&self, path: &str) -> Option<Rc<dyn Template<T>>>;
}

impl <T, S: TemplateSource<T> + ?Sized> TemplateSource<T> for Rc<S> {
    fn load(&self, path: &str) -> Option<Rc<dyn Template<T>>> {
        return (**self).load(path)
    }
}

// In-memory source for hosts that register their templates up front.
pub struct TemplateLibrary<T> {
    templates: HashMap<String, Rc<dyn Template<T>>>,
}

impl <T> TemplateLibrary<T> {
    pub fn new() -> Self {
        return Self { templates: HashMap::new() }
    }

    pub fn register<F>(&mut self, path: &str, template: F)
    where
        F: Template<T> + 'static,
    {
        self.templates.insert(path.to_owned(), Rc::new(template));
    }

    pub fn with<F>(mut self, path: &str, template: F) -> Self
    where
        F: Template<T> + 'static,
    {
        self.register(path, template);
        return self
    }

    pub fn len(&self) -> usize {
        return self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        return self.templates.is_empty()
    }
}

impl <T> Default for TemplateLibrary<T> {
    fn default() -> Self {
        return Self::new()
    }
}

impl <T> TemplateSource<T> for TemplateLibrary<T> {
    fn load(&self, path: &str) -> Option<Rc<dyn Template<T>>> {
        return self.templates.get(path).cloned()
    }
}

// Memoized outcome of resolving a factory path. Failed is terminal.
pub(crate) enum TemplateState<T> {
    Unresolved,
    Resolved(Rc<dyn Template<T>>),
    Failed,
}
