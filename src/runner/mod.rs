//! Rules of the endless runner minigame.
//!
//! The player runs in one of three lanes while coins and trees scroll toward
//! them. Speed grows with the score; hitting a tree ends the run.

use bevy_ecs::{component::Component, resource::Resource};
use strum_macros::{AsRefStr, EnumIter};

use crate::constants::runner::{COIN_VALUE, LANES, LARGE_COIN_VALUE, START_LANE};
use crate::data::PetId;

pub mod collision;
pub mod lane;
pub mod spawn;

pub use collision::{CollisionPass, Hit};
pub use lane::{smooth_toward, LaneInput};
pub use spawn::{plan_spawns, SpawnPlan, SpawnScheduler};

/// Forward speed for a given score.
pub fn current_speed(base_speed: f32, increment_per_point: f32, score: u32) -> f32 {
    base_speed + score as f32 * increment_per_point
}

/// Seconds between spawn attempts, shrinking as the speed grows.
pub fn spawn_interval(base_interval: f32, speed: f32, base_speed: f32) -> f32 {
    let multiplier = speed / base_speed;
    if multiplier > 0.0 {
        base_interval / multiplier
    } else {
        base_interval
    }
}

/// Lifecycle of one runner session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum RunnerStage {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Player requests that move a session between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum StageCommand {
    Start,
    Pause,
    Resume,
    TogglePause,
    Restart,
}

impl RunnerStage {
    /// The stage a command leads to, or `None` if the command does not apply.
    pub fn apply(self, command: StageCommand) -> Option<RunnerStage> {
        use RunnerStage::*;
        match (self, command) {
            (NotStarted, StageCommand::Start) => Some(Running),
            (Running, StageCommand::Pause | StageCommand::TogglePause) => Some(Paused),
            (Paused, StageCommand::Resume | StageCommand::TogglePause) => Some(Running),
            (Running | Paused | GameOver, StageCommand::Restart) => Some(Running),
            _ => None,
        }
    }

    pub fn is_running(self) -> bool {
        self == RunnerStage::Running
    }

    /// Lane input is honored in every stage except after a crash.
    pub fn accepts_lane_input(self) -> bool {
        self != RunnerStage::GameOver
    }
}

/// Session-wide runner state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RunnerState {
    pub pet: PetId,
    pub stage: RunnerStage,
    /// Only ever grows while a run is live; reset on restart.
    pub score: u32,
    pub lane: usize,
    /// Smoothed, rendered x of the player.
    pub player_x: f32,
}

impl RunnerState {
    pub fn new(pet: PetId) -> Self {
        Self {
            pet,
            stage: RunnerStage::NotStarted,
            score: 0,
            lane: START_LANE,
            player_x: LANES[START_LANE],
        }
    }

    /// Clears everything a restart throws away. The stage is left to the caller.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lane = START_LANE;
        self.player_x = LANES[START_LANE];
    }

    pub fn target_x(&self) -> f32 {
        LANES[self.lane]
    }

    pub fn award(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
    }
}

/// Session-local entity identifier, unique for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunnerEntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum RunnerEntityKind {
    Coin,
    LargeCoin,
    Tree,
}

impl RunnerEntityKind {
    /// Score awarded on pickup; trees award nothing.
    pub fn value(self) -> u32 {
        match self {
            RunnerEntityKind::Coin => COIN_VALUE,
            RunnerEntityKind::LargeCoin => LARGE_COIN_VALUE,
            RunnerEntityKind::Tree => 0,
        }
    }

    pub fn is_collectible(self) -> bool {
        self != RunnerEntityKind::Tree
    }
}

/// A coin or obstacle scrolling toward the player.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RunnerEntity {
    pub id: RunnerEntityId,
    pub kind: RunnerEntityKind,
    pub lane: usize,
    /// Negative is ahead of the player; grows toward the camera.
    pub z: f32,
    /// Where `z` was before this frame's motion.
    pub prev_z: f32,
}

impl RunnerEntity {
    pub fn new(id: RunnerEntityId, kind: RunnerEntityKind, lane: usize, z: f32) -> Self {
        Self {
            id,
            kind,
            lane,
            z,
            prev_z: z,
        }
    }

    pub fn x(&self) -> f32 {
        LANES[self.lane.min(LANES.len() - 1)]
    }
}
