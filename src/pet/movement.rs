//! Bounded random-walk for hatched pets.
//!
//! Each movement segment starts at full speed and decelerates along an easing
//! curve. Once the pet has effectively stopped it pauses for a random moment,
//! then turns by up to a quarter circle either way and sets off again.

use bevy_ecs::component::Component;
use glam::Vec2;
use rand::Rng;

use crate::clock::Millis;
use crate::config::MovementConfig;
use crate::constants::movement::NEW_DIRECTION_SPREAD;
use crate::sprite::Facing;

/// Speed after `progress` of the current segment: `base * (1 - progress)^power`.
pub fn eased_speed(base: f32, progress: f32, power: i32) -> f32 {
    base * (1.0 - progress.clamp(0.0, 1.0)).powi(power)
}

/// Rotates a heading by `offset` radians, returning a unit vector.
pub fn rotate_heading(direction: Vec2, offset: f32) -> Vec2 {
    let angle = direction.y.atan2(direction.x) + offset;
    Vec2::from_angle(angle)
}

/// Clamps `position` into the box, mirroring the direction on each axis that was exceeded.
pub fn bounce(mut position: Vec2, mut direction: Vec2, min: Vec2, max: Vec2) -> (Vec2, Vec2) {
    if position.x < min.x || position.x > max.x {
        direction.x = -direction.x;
        position.x = position.x.clamp(min.x, max.x);
    }
    if position.y < min.y || position.y > max.y {
        direction.y = -direction.y;
        position.y = position.y.clamp(min.y, max.y);
    }
    (position, direction)
}

/// Sprite facing for a heading: the dominant axis wins.
pub fn facing_for(direction: Vec2) -> Facing {
    if direction.x.abs() > direction.y.abs() {
        if direction.x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    } else if direction.y > 0.0 {
        Facing::Up
    } else {
        Facing::Front
    }
}

/// What a single movement step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderStep {
    Moved,
    /// Stopped and waiting for the resume deadline.
    Waiting,
    /// Picked a new heading and restarted the segment.
    Turned,
}

/// Per-pet movement state. Ephemeral: never persisted.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Wander {
    pub position: Vec2,
    /// Unit vector.
    pub direction: Vec2,
    /// Progress through the current segment, `[0, 1]`.
    pub progress: f32,
    pub speed: f32,
    /// Wall-clock time at which a stopped pet may set off again.
    pub resume_at: Option<Millis>,
    pub facing: Facing,
}

impl Wander {
    /// Starts at `position` heading in a uniformly random direction.
    pub fn spawn(position: Vec2, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        Self::heading(position, Vec2::from_angle(angle))
    }

    pub fn heading(position: Vec2, direction: Vec2) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec2::X);
        Self {
            position,
            direction,
            progress: 0.0,
            speed: 0.0,
            resume_at: None,
            facing: facing_for(direction),
        }
    }

    /// Advances one frame. `delta` is the clamped frame delta in seconds.
    pub fn step(&mut self, delta: f32, now: Millis, tuning: &MovementConfig, rng: &mut impl Rng) -> WanderStep {
        self.progress = (self.progress + tuning.progress_rate).min(1.0);
        self.speed = eased_speed(tuning.base_speed, self.progress, tuning.easing_power);

        if self.speed < tuning.min_speed {
            match self.resume_at {
                None => {
                    let wait = rng.random::<f32>() * tuning.max_wait_ms;
                    self.resume_at = Some(now + wait as Millis);
                    return WanderStep::Waiting;
                }
                Some(resume_at) if now < resume_at => return WanderStep::Waiting,
                Some(_) => {
                    let offset = (rng.random::<f32>() - 0.5) * NEW_DIRECTION_SPREAD;
                    self.direction = rotate_heading(self.direction, offset);
                    self.progress = 0.0;
                    self.resume_at = None;
                    self.facing = facing_for(self.direction);
                    return WanderStep::Turned;
                }
            }
        }

        let next = self.position + self.direction * self.speed * delta;
        let (position, direction) = bounce(next, self.direction, tuning.bounds_min(), tuning.bounds_max());
        self.position = position;
        self.direction = direction;
        self.facing = facing_for(direction);
        WanderStep::Moved
    }
}
