use bevy_ecs::component::Component;

use crate::clock::Millis;
use crate::data::{Pet, PetPatch};

/// One-shot guard around the egg → hatched transition.
///
/// Once the guard has fired, or has observed an already hatched pet, it never fires
/// again for the lifetime of the mounted pet.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HatchGuard {
    settled: bool,
}

impl HatchGuard {
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Returns the evolution patch if the egg has incubated for longer than `incubation_ms`.
    pub fn check(&mut self, pet: &Pet, now: Millis, incubation_ms: i64) -> Option<PetPatch> {
        if self.settled {
            return None;
        }

        if !pet.is_egg() {
            self.settled = true;
            return None;
        }

        // Eggs without a creation time never become eligible
        let age = pet.age_ms(now)?;
        if age <= incubation_ms {
            return None;
        }

        self.settled = true;
        Some(PetPatch {
            evolution: Some(pet.evolution.hatched()),
            ..Default::default()
        })
    }
}

/// Accumulator for the egg-shell animation shown while a pet hatches.
///
/// Purely visual: the stage transition has already been recorded when this starts.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HatchAnimation {
    pub elapsed_ms: f32,
    pub duration_ms: f32,
}

impl HatchAnimation {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            elapsed_ms: 0.0,
            duration_ms,
        }
    }

    /// Advances by a frame delta in seconds. Returns `true` once the animation has finished.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.elapsed_ms += delta * 1000.0;
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Horizontal distance each shell half has drifted from the center.
    pub fn shell_offset(&self) -> f32 {
        self.elapsed_ms * 0.001
    }

    pub fn shell_opacity(&self) -> f32 {
        (1.0 - self.progress()).max(0.0)
    }
}
