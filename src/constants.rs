//! This module contains all the constants used by the simulation.

/// The largest frame delta (in seconds) the simulation will integrate in a single step.
///
/// A browser tab that was backgrounded can report a delta of several seconds, which would
/// teleport entities across the scene.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Milliseconds in one hour, used to convert wall-clock gaps into decay amounts.
pub const MS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;

/// Constants for the pet lifecycle (hatching, needs and waste).
pub mod pet {
    /// Maximum number of characters allowed in a pet name.
    pub const MAX_NAME_LENGTH: usize = 20;
    /// Experience points required per level.
    pub const XP_PER_LEVEL: u32 = 100;

    /// How long an egg incubates before it hatches, in milliseconds.
    pub const INCUBATION_MS: i64 = 6_000;
    /// Duration of the egg-shell animation played on hatching, in milliseconds.
    pub const HATCH_ANIMATION_MS: f32 = 500.0;

    /// Minimum wall-clock gap between two degradation steps, in milliseconds.
    pub const DEGRADATION_INTERVAL_MS: i64 = 30_000;
    /// Hunger gained per hour of wall-clock time.
    pub const HUNGER_RATE_PER_HOUR: f64 = 0.1;
    /// Happiness lost per hour of wall-clock time.
    pub const HAPPINESS_RATE_PER_HOUR: f64 = 0.025;

    /// A hatched pet drops waste this often, in milliseconds.
    pub const WASTE_INTERVAL_MS: i64 = 10_000;
    /// Catalog id of the small waste home object.
    pub const WASTE_OBJECT_ID: u32 = 1;
    /// Home object kind for things that get cleaned up.
    pub const TEMPORARY_KIND: &str = "temporary";
}

/// Constants for the wandering movement of hatched pets.
pub mod movement {
    use glam::Vec2;

    /// Speed at the start of every movement segment, in scene units per second.
    pub const BASE_SPEED: f32 = 0.8;
    /// Progress added to the current segment every frame.
    pub const PROGRESS_RATE: f32 = 0.01;
    /// Exponent of the deceleration curve (cubic).
    pub const EASING_POWER: i32 = 3;
    /// Below this speed the pet counts as stopped.
    pub const MIN_SPEED: f32 = 0.0001;
    /// Total angular spread (radians) a new heading may deviate from the old one.
    pub const NEW_DIRECTION_SPREAD: f32 = std::f32::consts::PI;
    /// Upper bound of the random pause after stopping, in milliseconds.
    pub const MAX_WAIT_MS: f32 = 2000.0;

    /// Lower corner of the home area.
    pub const BOUNDS_MIN: Vec2 = Vec2::new(-8.0, -6.0);
    /// Upper corner of the home area.
    pub const BOUNDS_MAX: Vec2 = Vec2::new(8.0, 6.0);
}

/// Constants for the waste cleanup animation.
pub mod cleanup {
    /// Horizontal launch speed of a flung waste object.
    pub const FLING_SPEED_X: f32 = 1.5;
    /// Vertical launch speed of a flung waste object.
    pub const FLING_SPEED_UP: f32 = 4.0;
    /// Downward acceleration while flung.
    pub const GRAVITY: f32 = 9.8;
    /// Height waste rests at above the ground plane.
    pub const REST_HEIGHT: f32 = 0.03;
    /// How long the splat stays visible after landing, in milliseconds.
    pub const SPLAT_DURATION_MS: f32 = 300.0;
}

/// Constants for the endless runner minigame.
pub mod runner {
    /// Number of lanes.
    pub const LANE_COUNT: usize = 3;
    /// The lane the player starts in.
    pub const START_LANE: usize = 1;
    /// Horizontal distance between lanes.
    pub const LANE_WIDTH: f32 = 2.0;
    /// X coordinate of each lane, left to right.
    pub const LANES: [f32; LANE_COUNT] = [-LANE_WIDTH, 0.0, LANE_WIDTH];

    /// Forward speed at a score of zero, in units per second.
    pub const BASE_SPEED: f32 = 5.0;
    /// Extra forward speed per point of score.
    pub const SPEED_INCREMENT_PER_POINT: f32 = 0.05;

    /// Seconds between spawn attempts at base speed.
    pub const BASE_SPAWN_INTERVAL: f32 = 0.5;
    /// Chance a coin spawns on a given attempt.
    pub const COIN_CHANCE: f32 = 0.5;
    /// Chance a large coin spawns on a given attempt (once unlocked).
    pub const LARGE_COIN_CHANCE: f32 = 0.15;
    /// Chance a tree spawns on a given attempt.
    pub const TREE_CHANCE: f32 = 0.375;
    /// Score required before large coins start appearing.
    pub const LARGE_COIN_SCORE_GATE: u32 = 20;

    /// Forward coordinate new entities appear at.
    pub const SPAWN_Z: f32 = -20.0;
    /// Entities further forward than this have scrolled past the camera.
    pub const DESPAWN_Z: f32 = 2.0;

    /// Minimum horizontal swipe distance in pixels to count as a lane change.
    pub const MIN_SWIPE_DISTANCE: f32 = 50.0;
    /// Rate of the exponential smoothing of the rendered player x.
    pub const LANE_SMOOTHING: f32 = 12.0;

    /// Score awarded for a coin.
    pub const COIN_VALUE: u32 = 1;
    /// Score awarded for a large coin.
    pub const LARGE_COIN_VALUE: u32 = 5;
}

/// Collision tolerances for runner entities, as half-extents around the player.
pub mod collider {
    /// Coin pickup: lateral tolerance.
    pub const COIN_X: f32 = 0.35;
    /// Coin pickup: forward tolerance.
    pub const COIN_Z: f32 = 0.6;
    /// Large coin pickup: lateral tolerance.
    pub const LARGE_COIN_X: f32 = 0.45;
    /// Large coin pickup: forward tolerance.
    pub const LARGE_COIN_Z: f32 = 0.75;
    /// Tree: lateral tolerance.
    pub const TREE_X: f32 = 0.3;
    /// Tree: the hit band starts this far in front of the player.
    pub const TREE_Z_NEAR: f32 = -0.5;
    /// Tree: the hit band ends this far behind the player.
    pub const TREE_Z_FAR: f32 = 0.3;
}

/// Sprite animation timing.
pub mod animation {
    /// Seconds between frame flips for pets at home.
    pub const HOME_FLIP_INTERVAL: f32 = 0.5;
    /// Seconds between frame flips for the runner avatar.
    pub const RUNNER_FLIP_INTERVAL: f32 = 0.3;
}
