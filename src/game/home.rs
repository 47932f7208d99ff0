use std::sync::Arc;

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use glam::{Vec2, Vec3};
use tracing::trace;

use crate::clock::Millis;
use crate::config::Config;
use crate::data::{HomeObject, PetId, UserData};
use crate::events::{HomeCommand, HomeEvent};
use crate::pet::{CleanupPhase, HatchAnimation, Wander, WasteCleanup};
use crate::sprite::{Facing, SpriteKey, SpriteTable};
use crate::systems::pet::{
    degradation_system, hatch_animation_system, hatching_system, pet_roster_system, pet_sprite_system, waste_cleanup_system,
    waste_click_system, waste_drop_system, wander_system,
};
use crate::systems::{DeltaTime, GameRng, Now, PetSprite, PetTag, Sprites, UserSnapshot};

/// What the presentation layer needs to draw one pet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetView {
    pub pet: PetId,
    pub position: Vec2,
    pub facing: Facing,
    pub sprite: SpriteKey,
    /// Progress of the hatch animation, while it plays.
    pub hatching: Option<f32>,
}

/// A waste object mid-cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupView {
    pub object: HomeObject,
    pub position: Vec3,
    pub splatted: bool,
}

/// The home scene: every owned pet, wandering and aging.
///
/// Ticks never touch the user document. Each tick takes the current snapshot and
/// returns the patches the caller should apply.
pub struct HomeScene {
    pub world: World,
    pub schedule: Schedule,
}

impl HomeScene {
    pub fn new(config: &Config, sprites: SpriteTable, rng: GameRng) -> HomeScene {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<HomeCommand>(&mut world);
        EventRegistry::register_event::<HomeEvent>(&mut world);

        world.insert_resource(config.pet.clone());
        world.insert_resource(config.movement.clone());
        world.insert_resource(Sprites(sprites));
        world.insert_resource(rng);
        world.insert_resource(UserSnapshot::default());
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(Now(0));

        // Hatching is decided before decay, and both before anything moves
        schedule.add_systems(
            (
                pet_roster_system,
                waste_click_system,
                hatching_system,
                degradation_system,
                hatch_animation_system,
                wander_system,
                waste_drop_system,
                waste_cleanup_system,
                pet_sprite_system,
            )
                .chain(),
        );

        HomeScene { world, schedule }
    }

    /// Queues input for the next tick.
    pub fn send(&mut self, command: HomeCommand) {
        self.world.resource_mut::<Events<HomeCommand>>().send(command);
    }

    /// Advances the scene one frame. `delta` must already be clamped.
    pub fn tick(&mut self, snapshot: Arc<UserData>, delta: f32, now: Millis) -> Vec<HomeEvent> {
        self.world.insert_resource(DeltaTime(delta));
        self.world.insert_resource(Now(now));
        self.world.insert_resource(UserSnapshot(snapshot));

        self.schedule.run(&mut self.world);

        self.world.resource_mut::<Events<HomeCommand>>().clear();
        let effects: Vec<HomeEvent> = self.world.resource_mut::<Events<HomeEvent>>().drain().collect();
        if !effects.is_empty() {
            trace!(count = effects.len(), "Home tick produced effects");
        }
        effects
    }

    pub fn pets(&mut self) -> Vec<PetView> {
        let mut query = self
            .world
            .query::<(&PetTag, &Wander, &PetSprite, Option<&HatchAnimation>)>();
        let mut views: Vec<PetView> = query
            .iter(&self.world)
            .map(|(tag, wander, sprite, hatching)| PetView {
                pet: tag.0,
                position: wander.position,
                facing: wander.facing,
                sprite: sprite.0,
                hatching: hatching.map(HatchAnimation::progress),
            })
            .collect();
        views.sort_by_key(|view| view.pet);
        views
    }

    pub fn pet(&mut self, id: PetId) -> Option<PetView> {
        self.pets().into_iter().find(|view| view.pet == id)
    }

    pub fn cleanups(&mut self) -> Vec<CleanupView> {
        let mut query = self.world.query::<&WasteCleanup>();
        query
            .iter(&self.world)
            .map(|cleanup| CleanupView {
                object: cleanup.object.clone(),
                position: cleanup.position(),
                splatted: matches!(cleanup.phase, CleanupPhase::Splatted { .. }),
            })
            .collect()
    }

    /// Whether a waste object is currently being flung away.
    pub fn is_cleaning(&mut self, object: &HomeObject) -> bool {
        let mut query = self.world.query::<&WasteCleanup>();
        query.iter(&self.world).any(|cleanup| cleanup.object.same_object(object))
    }
}
