use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use crate::definition::{PoolDefinition, SizePolicy};
use crate::item::{Container, ItemId, Pooled, PooledItem};
use crate::placement::{Placeable, Pose, Position, Rotation};
use crate::pool::{Pool, Reclaimed};
use crate::template::{Template, TemplateSource};

pub type DropCounter = Rc<Cell<usize>>;

// Item that records everything the pool does to it
#[derive(Debug)]
pub struct Probe {
    pub template: String,
    pub active: bool,
    pub resets: usize,
    pub container: Option<Container>,
    pub pose: Pose,
    pub drops: DropCounter,
}

impl Probe {
    pub fn new(template: &str) -> Self {
        return Self::with_drops(template, DropCounter::default())
    }

    pub fn with_drops(template: &str, drops: DropCounter) -> Self {
        return Self {
            template: template.to_owned(),
            active: true,
            resets: 0,
            container: None,
            pose: Pose::IDENTITY,
            drops,
        }
    }
}

impl PooledItem for Probe {
    fn reset_state(&mut self) {
        self.active = true;
        self.resets += 1;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn attach_to(&mut self, container: &Container) {
        self.container = Some(container.clone());
    }
}

impl Placeable for Probe {
    fn set_parent(&mut self, parent: &Container) {
        self.container = Some(parent.clone());
    }

    fn set_local_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_position(&mut self, position: Position) {
        self.pose.position = position;
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.pose.rotation = rotation;
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

struct ProbeTemplate {
    path: String,
    drops: DropCounter,
}

impl Template<Probe> for ProbeTemplate {
    fn instantiate(&self, container: &Container) -> Probe {
        let mut probe: Probe = Probe::with_drops(&self.path, self.drops.clone());
        probe.container = Some(container.clone());
        return probe
    }
}

// Template source that knows a fixed set of paths and counts lookups
pub struct CountingSource {
    paths: Vec<String>,
    loads: Cell<usize>,
    drops: DropCounter,
}

impl CountingSource {
    pub fn with_paths(paths: &[&str]) -> Self {
        return Self {
            paths: paths.iter().map(|path| path.to_string()).collect(),
            loads: Cell::new(0),
            drops: DropCounter::default(),
        }
    }

    pub fn loads(&self) -> usize {
        return self.loads.get()
    }

    pub fn drops(&self) -> usize {
        return self.drops.get()
    }
}

impl TemplateSource<Probe> for CountingSource {
    fn load(&self, path: &str) -> Option<Rc<dyn Template<Probe>>> {
        self.loads.set(self.loads.get() + 1);
        if !self.paths.iter().any(|known| known == path) {
            return None
        }

        return Some(Rc::new(ProbeTemplate { path: path.to_owned(), drops: self.drops.clone() }))
    }
}

pub fn fuzz_many_pools_few_mutations() {
    const NUM_POOLS_TO_FUZZ: usize = 2_000;
    const MAX_NUM_MUTATIONS: usize = 10;
    fuzz_many_pools(NUM_POOLS_TO_FUZZ, MAX_NUM_MUTATIONS);
}

pub fn fuzz_few_pools_many_mutations() {
    const NUM_POOLS_TO_FUZZ: usize = 50;
    const MAX_NUM_MUTATIONS: usize = 2_000;
    fuzz_many_pools(NUM_POOLS_TO_FUZZ, MAX_NUM_MUTATIONS);
}

/*
    Straightforward model of what a pool is supposed to do, tracking item ids
    only. The fuzzer drives a real pool and this model with the same random
    operations and checks that they never disagree.
*/
struct ReferencePool {
    size_policy: SizePolicy,
    maximum_size: usize,
    idle: VecDeque<ItemId>,
    num_created: u64,
    resets: HashMap<ItemId, usize>, // how many times each item came back out of the idle queue
}

impl ReferencePool {
    fn new(size_policy: SizePolicy, maximum_size: usize) -> Self {
        return Self {
            size_policy,
            maximum_size,
            idle: VecDeque::new(),
            num_created: 0,
            resets: HashMap::new(),
        }
    }

    fn get(&mut self) -> ItemId {
        if let Some(id) = self.idle.pop_front() {
            *self.resets.entry(id).or_insert(0) += 1;
            return id
        }

        let id: ItemId = ItemId(self.num_created);
        self.num_created += 1;
        self.resets.insert(id, 0);
        return id
    }

    fn expected_resets(&self, id: ItemId) -> usize {
        return self.resets.get(&id).copied().unwrap_or(0)
    }

    fn reclaim(&mut self, id: ItemId) -> Reclaimed {
        if self.size_policy == SizePolicy::Fixed && self.idle.len() >= self.maximum_size {
            return Reclaimed::Discarded
        }

        self.idle.push_back(id);
        return Reclaimed::Recycled
    }
}

#[derive(Clone, Copy, Debug)]
struct Construction {
    size_policy: SizePolicy,
    maximum_size: usize,
}

fn generate_random_construction<T: Rng>(rng: &mut T) -> Construction {
    const MAX_MAXIMUM_SIZE: usize = 32;
    let size_policy: SizePolicy = if rng.gen_bool(0.5) { SizePolicy::Fixed } else { SizePolicy::Flexible };
    let maximum_size: usize = rng.gen_range(0..=MAX_MAXIMUM_SIZE);
    return Construction { size_policy, maximum_size }
}

#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
enum Mutation {
    Get{id: ItemId},
    Reclaim{id: ItemId, outcome: Reclaimed},
}

#[derive(Debug)]
enum EqualityError {
    IdsDontMatch,
    OutcomesDontMatch,
    IdleCountsDontMatch,
    CreatedCountsDontMatch,
    CapacityExceeded,
    ActiveItemParked,
    ResetCountsDontMatch,
}

fn compare_for_equality(test: &Pool<Probe>, reference: &ReferencePool) -> Result<(), EqualityError> {
    if test.idle_count() != reference.idle.len() {
        return Err( EqualityError::IdleCountsDontMatch )
    }

    if test.created_count() != reference.num_created {
        return Err( EqualityError::CreatedCountsDontMatch )
    }

    if test.size_policy() == SizePolicy::Fixed && test.idle_count() > test.maximum_size() {
        return Err( EqualityError::CapacityExceeded )
    }

    return Ok(())
}

fn fuzz<T: Rng>(rng: &mut T, num_mutations_to_try: usize) {
    let construction: Construction = generate_random_construction(rng);
    let definition: PoolDefinition = PoolDefinition::new("fuzzed", "Prefabs/Probe")
        .with_policy(construction.size_policy)
        .with_sizes(0, construction.maximum_size);
    let source: Rc<CountingSource> = Rc::new(CountingSource::with_paths(&["Prefabs/Probe"]));
    let mut test: Pool<Probe> = Pool::new(&definition, source.clone());
    let mut reference: ReferencePool = ReferencePool::new(construction.size_policy, construction.maximum_size);

    let mut log: Vec<Mutation> = Vec::new();
    let mut active: Vec<Pooled<Probe>> = Vec::new(); // handed out, in the same order as active_ids
    let mut active_ids: Vec<ItemId> = Vec::new();
    let mut num_discarded: usize = 0;

    const MAX_NUM_ACTIVE: usize = 256;
    for _ in 0..num_mutations_to_try {
        let wants_get: bool = active.is_empty() || (active.len() < MAX_NUM_ACTIVE && rng.gen_bool(0.5));
        if wants_get {
            let item: Pooled<Probe> = test.get().unwrap();
            let id: ItemId = reference.get();
            log.push( Mutation::Get{ id } );

            if item.item_id() != id {
                panic!("{:?}\n{:?}\n{:?}", EqualityError::IdsDontMatch, construction, log);
            }
            if !item.active {
                panic!("{:?}\n{:?}\n{:?}", EqualityError::ActiveItemParked, construction, log);
            }
            if item.resets != reference.expected_resets(id) {
                panic!("{:?}\n{:?}\n{:?}", EqualityError::ResetCountsDontMatch, construction, log);
            }

            active.push(item);
            active_ids.push(id);
        }
        else {
            let index: usize = rng.gen_range(0..active.len());
            let item: Pooled<Probe> = active.swap_remove(index);
            let id: ItemId = active_ids.swap_remove(index);
            let outcome: Reclaimed = test.reclaim(item).unwrap();
            log.push( Mutation::Reclaim{ id, outcome } );

            if outcome != reference.reclaim(id) {
                panic!("{:?}\n{:?}\n{:?}", EqualityError::OutcomesDontMatch, construction, log);
            }
            if outcome == Reclaimed::Discarded {
                num_discarded += 1;
            }
        }

        if let Err(error) = compare_for_equality(&test, &reference) {
            panic!("{:?}\n{:?}\n{:?}", error, construction, log);
        }
    }

    // discarded items really are gone, nothing else is
    assert!(source.drops() == num_discarded, "{:?}\n{:?}", construction, log);
    assert!(source.loads() <= 1);
}

fn fuzz_many_pools(num_pools_to_fuzz: usize, max_num_mutations: usize) {
    /*
        Xoshiro256StarStar is seeded from the same value every time, so every
        run replays exactly the same sequence of gets and reclaims.
    */
    const RNG_SEED: u64 = 2049;
    let mut rng: Xoshiro256StarStar = Xoshiro256StarStar::seed_from_u64(RNG_SEED);

    for _ in 0..num_pools_to_fuzz {
        let num_mutations: usize = rng.gen_range(1..=max_num_mutations);
        fuzz(&mut rng, num_mutations);
    }
}
