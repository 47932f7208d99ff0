use rand::Rng;
use smallvec::SmallVec;

use crate::config::RunnerConfig;
use crate::constants::runner::LANE_COUNT;
use crate::runner::RunnerEntityKind;

/// Entities to spawn in one cycle, as `(kind, lane)`.
pub type SpawnPlan = SmallVec<[(RunnerEntityKind, usize); 3]>;

/// Accumulates frame time and signals when a spawn cycle is due.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SpawnScheduler {
    pub accumulator: f32,
}

impl SpawnScheduler {
    /// Returns `true` when the accumulated time exceeds `interval`, resetting it.
    pub fn advance(&mut self, delta: f32, interval: f32) -> bool {
        self.accumulator += delta;
        if self.accumulator > interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rolls one spawn cycle. Each category is drawn independently.
///
/// Large coins and trees never share a lane with something already placed this cycle,
/// so a coin is never hidden behind a tree.
pub fn plan_spawns(rng: &mut impl Rng, score: u32, tuning: &RunnerConfig) -> SpawnPlan {
    let mut plan = SpawnPlan::new();

    if rng.random::<f32>() < tuning.coin_chance {
        plan.push((RunnerEntityKind::Coin, rng.random_range(0..LANE_COUNT)));
    }

    if score >= tuning.large_coin_score_gate && rng.random::<f32>() < tuning.large_coin_chance {
        if let Some(lane) = free_lane(rng, &plan) {
            plan.push((RunnerEntityKind::LargeCoin, lane));
        }
    }

    if rng.random::<f32>() < tuning.tree_chance {
        if let Some(lane) = free_lane(rng, &plan) {
            plan.push((RunnerEntityKind::Tree, lane));
        }
    }

    plan
}

fn free_lane(rng: &mut impl Rng, plan: &SpawnPlan) -> Option<usize> {
    let free: SmallVec<[usize; LANE_COUNT]> = (0..LANE_COUNT)
        .filter(|lane| plan.iter().all(|(_, taken)| taken != lane))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}
