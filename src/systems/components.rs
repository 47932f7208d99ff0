use std::sync::Arc;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::clock::Millis;
use crate::constants::animation::HOME_FLIP_INTERVAL;
use crate::data::{Pet, PetId, UserData};
use crate::pet::{Degradation, HatchGuard, Wander, WasteTimer};
use crate::runner::{RunnerEntityId, SpawnScheduler};
use crate::sprite::{FrameFlipper, SpriteKey, SpriteTable};

/// Clamped frame delta in seconds.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// Wall-clock time of the current frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Now(pub Millis);

/// The scene's random source. Seeded in tests so runs are reproducible.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        Self(SmallRng::from_os_rng())
    }

    /// Derives an independent generator, e.g. for a new runner session.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.0.random())
    }
}

/// The user document as of the start of the frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct UserSnapshot(pub Arc<UserData>);

impl UserSnapshot {
    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.0.pet(id)
    }
}

/// Which sprite variants exist.
#[derive(Resource, Debug, Clone, Default)]
pub struct Sprites(pub SpriteTable);

/// Links a scene entity to the pet it shows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetTag(pub PetId);

/// The frame a pet should be drawn with this tick.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PetSprite(pub SpriteKey);

#[derive(Bundle)]
pub struct PetBundle {
    pub tag: PetTag,
    pub hatch: HatchGuard,
    pub degradation: Degradation,
    pub wander: Wander,
    pub waste: WasteTimer,
    pub flipper: FrameFlipper,
    pub sprite: PetSprite,
}

impl PetBundle {
    /// A pet mounted at the center of the home area.
    pub fn new(pet: &Pet, sprites: &SpriteTable, rng: &mut impl Rng) -> Self {
        let wander = Wander::spawn(Vec2::ZERO, rng);
        Self {
            tag: PetTag(pet.id),
            hatch: HatchGuard::default(),
            degradation: Degradation::default(),
            sprite: PetSprite(sprites.resolve(pet.evolution, wander.facing, 0)),
            wander,
            waste: WasteTimer::default(),
            flipper: FrameFlipper::new(HOME_FLIP_INTERVAL),
        }
    }
}

/// Spawn timing and id allocation for a runner session.
#[derive(Resource, Debug, Default)]
pub struct Spawner {
    pub scheduler: SpawnScheduler,
    next_id: u64,
}

impl Spawner {
    pub fn next_id(&mut self) -> RunnerEntityId {
        self.next_id += 1;
        RunnerEntityId(self.next_id)
    }

    pub fn reset(&mut self) {
        self.scheduler.reset();
    }
}

/// The runner's player sprite.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RunnerAvatar {
    pub flipper: FrameFlipper,
    pub sprite: SpriteKey,
}
