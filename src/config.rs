use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{movement, pet, runner};
use crate::error::{GameError, GameResult};

/// Pet lifecycle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct PetConfig {
    pub incubation_ms: i64,
    pub hatch_animation_ms: f32,
    pub degradation_interval_ms: i64,
    pub hunger_rate_per_hour: f64,
    pub happiness_rate_per_hour: f64,
    pub waste_interval_ms: i64,
    /// Whether hatched pets drop waste at all
    pub waste_enabled: bool,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            incubation_ms: pet::INCUBATION_MS,
            hatch_animation_ms: pet::HATCH_ANIMATION_MS,
            degradation_interval_ms: pet::DEGRADATION_INTERVAL_MS,
            hunger_rate_per_hour: pet::HUNGER_RATE_PER_HOUR,
            happiness_rate_per_hour: pet::HAPPINESS_RATE_PER_HOUR,
            waste_interval_ms: pet::WASTE_INTERVAL_MS,
            waste_enabled: true,
        }
    }
}

/// Wandering movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct MovementConfig {
    pub base_speed: f32,
    pub progress_rate: f32,
    pub easing_power: i32,
    pub min_speed: f32,
    pub max_wait_ms: f32,
    /// `[min, max]` on the x axis
    pub bounds_x: [f32; 2],
    /// `[min, max]` on the y axis
    pub bounds_y: [f32; 2],
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_speed: movement::BASE_SPEED,
            progress_rate: movement::PROGRESS_RATE,
            easing_power: movement::EASING_POWER,
            min_speed: movement::MIN_SPEED,
            max_wait_ms: movement::MAX_WAIT_MS,
            bounds_x: [movement::BOUNDS_MIN.x, movement::BOUNDS_MAX.x],
            bounds_y: [movement::BOUNDS_MIN.y, movement::BOUNDS_MAX.y],
        }
    }
}

impl MovementConfig {
    pub fn bounds_min(&self) -> Vec2 {
        Vec2::new(self.bounds_x[0], self.bounds_y[0])
    }

    pub fn bounds_max(&self) -> Vec2 {
        Vec2::new(self.bounds_x[1], self.bounds_y[1])
    }
}

/// Endless runner tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct RunnerConfig {
    pub base_speed: f32,
    pub speed_increment_per_point: f32,
    pub base_spawn_interval: f32,
    pub coin_chance: f32,
    pub large_coin_chance: f32,
    pub tree_chance: f32,
    pub large_coin_score_gate: u32,
    pub lane_smoothing: f32,
    pub min_swipe_distance: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_speed: runner::BASE_SPEED,
            speed_increment_per_point: runner::SPEED_INCREMENT_PER_POINT,
            base_spawn_interval: runner::BASE_SPAWN_INTERVAL,
            coin_chance: runner::COIN_CHANCE,
            large_coin_chance: runner::LARGE_COIN_CHANCE,
            tree_chance: runner::TREE_CHANCE,
            large_coin_score_gate: runner::LARGE_COIN_SCORE_GATE,
            lane_smoothing: runner::LANE_SMOOTHING,
            min_swipe_distance: runner::MIN_SWIPE_DISTANCE,
        }
    }
}

/// Settings for the headless demo binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to simulate in the home scene
    pub home_frames: u32,
    /// Frames to simulate in the runner session
    pub runner_frames: u32,
    /// Simulated frame length in milliseconds
    pub frame_ms: u32,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            home_frames: 60 * 40,
            runner_frames: 60 * 30,
            frame_ms: 16,
            seed: None,
        }
    }
}

/// Main application configuration
///
/// Loaded from built-in defaults, overridden by `VARMINTS_`-prefixed environment
/// variables, with `__` separating nested keys (e.g. `VARMINTS_PET__INCUBATION_MS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pet: PetConfig,
    pub movement: MovementConfig,
    pub runner: RunnerConfig,
    pub demo: DemoConfig,
}

impl Config {
    /// Loads the configuration from defaults and the environment.
    pub fn load() -> GameResult<Config> {
        Self::from_figment(Self::figment())
    }

    /// The provider stack used by [`Config::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("VARMINTS_").split("__"))
    }

    /// Extracts and validates a configuration from an arbitrary provider stack.
    pub fn from_figment(figment: Figment) -> GameResult<Config> {
        let config: Config = figment.extract().map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> GameResult<()> {
        let movement = &self.movement;
        if movement.bounds_x[0] >= movement.bounds_x[1] || movement.bounds_y[0] >= movement.bounds_y[1] {
            return Err(GameError::Config(format!(
                "movement bounds must be ordered (x: {:?}, y: {:?})",
                movement.bounds_x, movement.bounds_y
            )));
        }
        if movement.progress_rate <= 0.0 || movement.base_speed < 0.0 || movement.easing_power < 1 {
            return Err(GameError::Config(
                "movement progress_rate must be positive, base_speed non-negative and easing_power at least 1".into(),
            ));
        }

        let pet = &self.pet;
        if pet.degradation_interval_ms <= 0 || pet.waste_interval_ms <= 0 || pet.incubation_ms < 0 {
            return Err(GameError::Config("pet intervals must be positive".into()));
        }
        if pet.hunger_rate_per_hour < 0.0 || pet.happiness_rate_per_hour < 0.0 {
            return Err(GameError::Config("degradation rates must be non-negative".into()));
        }

        let runner = &self.runner;
        if runner.base_speed <= 0.0 || runner.base_spawn_interval <= 0.0 || runner.lane_smoothing <= 0.0 {
            return Err(GameError::Config(
                "runner base_speed, base_spawn_interval and lane_smoothing must be positive".into(),
            ));
        }
        if runner.speed_increment_per_point < 0.0 {
            return Err(GameError::Config("runner speed_increment_per_point must be non-negative".into()));
        }
        for (name, chance) in [
            ("coin_chance", runner.coin_chance),
            ("large_coin_chance", runner.large_coin_chance),
            ("tree_chance", runner.tree_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GameError::Config(format!("runner {name} must be within [0, 1], got {chance}")));
            }
        }

        if self.demo.frame_ms == 0 {
            return Err(GameError::Config("demo frame_ms must be positive".into()));
        }

        Ok(())
    }
}
