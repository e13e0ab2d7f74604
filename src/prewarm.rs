use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::TurnBudget;
use crate::item::PooledItem;
use crate::pool::Pool;
use crate::registry::Pools;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrewarmSummary {
    pub items_created: usize,
    pub turns: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrewarmStatus {
    /// The turn budget ran out; call advance again next turn.
    Suspended,
    Done(PrewarmSummary),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    Idle,
    SelectingPool,
    Draining { pool: String, remaining: usize },
    Done(PrewarmSummary),
}

/*
    Creates the initial items of every prewarm pool, a bounded number per
    turn. Pools are drained one at a time in ascending priority order (ties
    keep registration order). When a turn's budget runs out mid-pool, the
    next turn picks up the same pool where it stopped.

    Items made here go straight into their pool's idle queue, so anything
    acquired between two turns sees exactly what was created so far.
*/
pub struct PrewarmScheduler {
    queue: VecDeque<String>,
    state: State,
    progress_interval: Duration,

    items_created: usize,
    turns: usize,
    started: Option<Instant>,
    last_progress_log: Option<Instant>,
    num_progress_logs: usize,
}

impl PrewarmScheduler {
    pub fn new<'a, I>(candidates: I, progress_interval: Duration) -> Self
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let mut candidates: Vec<(&'a str, i32)> = candidates.into_iter().collect();
        candidates.sort_by_key(|&(_, priority)| priority); // stable, so ties keep their order
        let queue: VecDeque<String> = candidates.into_iter()
            .map(|(id, _)| id.to_owned())
            .collect();

        return Self {
            queue,
            state: State::Idle,
            progress_interval,

            items_created: 0,
            turns: 0,
            started: None,
            last_progress_log: None,
            num_progress_logs: 0,
        }
    }

    /// Pools still waiting to be drained, not counting the current one.
    pub fn pending(&self) -> usize {
        return self.queue.len()
    }

    pub fn current_pool(&self) -> Option<&str> {
        match &self.state {
            State::Draining { pool, .. } => return Some(pool),
            _ => return None,
        }
    }

    pub fn items_created(&self) -> usize {
        return self.items_created
    }

    pub fn turns(&self) -> usize {
        return self.turns
    }

    /// Progress messages emitted so far, after throttling.
    pub fn progress_logs(&self) -> usize {
        return self.num_progress_logs
    }

    pub fn is_done(&self) -> bool {
        return matches!(self.state, State::Done(_))
    }

    pub fn summary(&self) -> Option<PrewarmSummary> {
        match self.state {
            State::Done(summary) => return Some(summary),
            _ => return None,
        }
    }

    /// Runs a single turn, creating at most `budget` items.
    pub fn advance<T: PooledItem>(&mut self, pools: &mut Pools<T>, budget: TurnBudget) -> PrewarmStatus {
        if let State::Done(summary) = self.state {
            return PrewarmStatus::Done(summary)
        }

        if self.state == State::Idle {
            tracing::debug!(pools = self.queue.len(), "prewarm started");
            self.started = Some(Instant::now());
            self.state = State::SelectingPool;
        }

        self.turns += 1;
        let mut left: Option<usize> = match budget.limit() { // None means unbounded
            Some(0) => {
                tracing::warn!("prewarm turn budget of 0 would never finish, creating one item instead");
                Some(1)
            },
            limit => limit,
        };
        loop {
            if left == Some(0) {
                self.log_progress();
                return PrewarmStatus::Suspended
            }

            match std::mem::replace(&mut self.state, State::SelectingPool) {
                State::Idle | State::SelectingPool => {
                    match self.select_next_pool(pools) {
                        Some((pool, remaining)) => self.state = State::Draining { pool, remaining },
                        None => return PrewarmStatus::Done(self.finish()),
                    }
                },

                State::Draining { pool, remaining } => {
                    let allowance: usize = match left {
                        Some(left) => left.min(remaining),
                        None => remaining,
                    };

                    let created: usize = match pools.get_mut(&pool) {
                        Some(target) => create_idle_items(target, allowance),
                        None => 0,
                    };
                    self.items_created += created;
                    if let Some(left) = left.as_mut() {
                        *left -= allowance;
                    }

                    // A pool that stops creating mid-quota is treated as warm.
                    let remaining: usize = if created < allowance { 0 } else { remaining - allowance };
                    if remaining == 0 {
                        tracing::debug!(pool = %pool, "pool prewarmed");
                        self.state = State::SelectingPool;
                    }
                    else {
                        self.state = State::Draining { pool, remaining };
                    }
                },

                State::Done(summary) => {
                    self.state = State::Done(summary);
                    return PrewarmStatus::Done(summary)
                },
            }
        }
    }

    fn select_next_pool<T: PooledItem>(&mut self, pools: &mut Pools<T>) -> Option<(String, usize)> {
        while let Some(id) = self.queue.pop_front() {
            let pool: &mut Pool<T> = match pools.get_mut(&id) {
                Some(pool) => pool,
                None => continue,
            };

            if pool.factory_path().is_empty() {
                tracing::warn!(pool = %id, "factory path is empty, skipping prewarm");
                continue;
            }

            if !pool.try_resolve() {
                tracing::warn!(pool = %id, path = pool.factory_path(), "no template found, skipping prewarm");
                continue;
            }

            let remaining: usize = pool.initial_size();
            return Some((id, remaining))
        }

        return None
    }

    fn log_progress(&mut self) {
        let now: Instant = Instant::now();
        let due: bool = match self.last_progress_log {
            Some(last) => now.duration_since(last) >= self.progress_interval,
            None => true,
        };

        if due {
            self.last_progress_log = Some(now);
            self.num_progress_logs += 1;
            tracing::info!(created = self.items_created, turns = self.turns, "prewarm in progress");
        }
    }

    fn finish(&mut self) -> PrewarmSummary {
        let elapsed: Duration = match self.started {
            Some(started) => started.elapsed(),
            None => Duration::ZERO,
        };
        let summary: PrewarmSummary = PrewarmSummary {
            items_created: self.items_created,
            turns: self.turns,
            elapsed,
        };

        tracing::info!(
            created = summary.items_created,
            turns = summary.turns,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "prewarm finished"
        );

        self.state = State::Done(summary);
        return summary
    }
}

fn create_idle_items<T: PooledItem>(pool: &mut Pool<T>, count: usize) -> usize {
    for created in 0..count {
        if !pool.create_idle() {
            return created
        }
    }

    return count
}
