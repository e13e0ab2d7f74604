use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum SizePolicy {
    /// Idle queue never grows past the maximum size; extra returns are dropped.
    #[default]
    Fixed,
    /// Every returned item is kept.
    Flexible,
}

const DEFAULT_INITIAL_SIZE: usize = 10;
const DEFAULT_MAXIMUM_SIZE: usize = 100;
const DEFAULT_PREWARM_PRIORITY: i32 = 1;

/// One already-parsed pool record. Missing fields take the same defaults a
/// hand-written pools file would get.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDefinition {
    pub id: String,
    #[serde(default)]
    pub factory_path: String,
    #[serde(default)]
    pub size_policy: SizePolicy,
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,
    #[serde(default = "default_maximum_size")]
    pub maximum_size: usize,
    #[serde(default)]
    pub prewarm: bool,
    #[serde(default = "default_prewarm_priority")]
    pub prewarm_priority: i32,
}

impl PoolDefinition {
    pub fn new(id: &str, factory_path: &str) -> Self {
        return Self {
            id: id.to_owned(),
            factory_path: factory_path.to_owned(),
            size_policy: SizePolicy::default(),
            initial_size: DEFAULT_INITIAL_SIZE,
            maximum_size: DEFAULT_MAXIMUM_SIZE,
            prewarm: false,
            prewarm_priority: DEFAULT_PREWARM_PRIORITY,
        }
    }

    pub fn with_policy(mut self, size_policy: SizePolicy) -> Self {
        self.size_policy = size_policy;
        return self
    }

    pub fn with_sizes(mut self, initial_size: usize, maximum_size: usize) -> Self {
        self.initial_size = initial_size;
        self.maximum_size = maximum_size;
        return self
    }

    pub fn prewarmed(mut self, prewarm_priority: i32) -> Self {
        self.prewarm = true;
        self.prewarm_priority = prewarm_priority;
        return self
    }
}

fn default_initial_size() -> usize {
    return DEFAULT_INITIAL_SIZE
}

fn default_maximum_size() -> usize {
    return DEFAULT_MAXIMUM_SIZE
}

fn default_prewarm_priority() -> i32 {
    return DEFAULT_PREWARM_PRIORITY
}
