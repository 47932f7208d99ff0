use bevy_ecs::component::Component;
use glam::{Vec2, Vec3};

use crate::clock::Millis;
use crate::constants::cleanup::{FLING_SPEED_UP, FLING_SPEED_X, GRAVITY, REST_HEIGHT, SPLAT_DURATION_MS};
use crate::data::HomeObject;

/// Schedules periodic waste drops for one hatched pet.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WasteTimer {
    last_drop: Option<Millis>,
}

impl WasteTimer {
    /// Returns `true` when a drop is due. The first observation only starts the timer.
    pub fn tick(&mut self, now: Millis, interval_ms: i64) -> bool {
        match self.last_drop {
            None => {
                self.last_drop = Some(now);
                false
            }
            Some(last) if now - last >= interval_ms => {
                self.last_drop = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanupPhase {
    Flying,
    Splatted { elapsed_ms: f32 },
    Done,
}

/// The fling-and-splat animation played when a waste object is clicked.
///
/// Once it reports done, the object is removed from the user document.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct WasteCleanup {
    pub object: HomeObject,
    /// Horizontal displacement from the object's resting spot.
    pub offset: f32,
    pub height: f32,
    /// Horizontal and vertical velocity.
    pub velocity: Vec2,
    pub phase: CleanupPhase,
}

impl WasteCleanup {
    /// Starts a fling. `side` picks the horizontal direction by its sign.
    pub fn fling(object: HomeObject, side: f32) -> Self {
        let sign = if side < 0.0 { -1.0 } else { 1.0 };
        Self {
            object,
            offset: 0.0,
            height: REST_HEIGHT,
            velocity: Vec2::new(FLING_SPEED_X * sign, FLING_SPEED_UP),
            phase: CleanupPhase::Flying,
        }
    }

    /// Advances by a frame delta in seconds. Returns `true` once the splat has faded.
    pub fn advance(&mut self, delta: f32) -> bool {
        match self.phase {
            CleanupPhase::Flying => {
                self.velocity.y -= GRAVITY * delta;
                self.offset += self.velocity.x * delta;
                self.height += self.velocity.y * delta;
                if self.velocity.y < 0.0 && self.height <= 0.0 {
                    self.height = 0.0;
                    self.phase = CleanupPhase::Splatted { elapsed_ms: 0.0 };
                }
            }
            CleanupPhase::Splatted { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + delta * 1000.0;
                self.phase = if elapsed_ms >= SPLAT_DURATION_MS {
                    CleanupPhase::Done
                } else {
                    CleanupPhase::Splatted { elapsed_ms }
                };
            }
            CleanupPhase::Done => {}
        }
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.phase == CleanupPhase::Done
    }

    /// Scene position: ground x/y plus height above the ground plane.
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.object.x + self.offset, self.object.y, self.height)
    }
}
