use std::collections::HashSet;

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    system::{Commands, Query, Res, ResMut},
};
use rand::Rng;
use tracing::{debug, info, trace};

use crate::config::{MovementConfig, PetConfig};
use crate::data::{HomeObject, PetId};
use crate::events::{HomeCommand, HomeEvent, PatchReason};
use crate::pet::{DecayRates, Degradation, DegradationStep, HatchAnimation, HatchGuard, Wander, WanderStep, WasteCleanup, WasteTimer};
use crate::sprite::FrameFlipper;
use crate::systems::components::{DeltaTime, GameRng, Now, PetBundle, PetSprite, PetTag, Sprites, UserSnapshot};

/// Mounts newly owned pets and unmounts pets that left the document.
pub fn pet_roster_system(
    mut commands: Commands,
    snapshot: Res<UserSnapshot>,
    sprites: Res<Sprites>,
    mut rng: ResMut<GameRng>,
    pets: Query<(Entity, &PetTag)>,
) {
    let mut mounted = HashSet::<PetId>::new();
    for (entity, tag) in pets.iter() {
        if snapshot.pet(tag.0).is_some() {
            mounted.insert(tag.0);
        } else {
            debug!(pet = %tag.0, "Unmounting pet");
            commands.entity(entity).despawn();
        }
    }

    for pet in snapshot.0.pets.iter().filter(|pet| !mounted.contains(&pet.id)) {
        debug!(pet = %pet.id, stage = pet.evolution.stage, "Mounting pet");
        commands.spawn(PetBundle::new(pet, &sprites.0, &mut rng.0));
    }
}

/// Starts the cleanup animation for clicked waste.
pub fn waste_click_system(
    mut commands: Commands,
    mut clicks: EventReader<HomeCommand>,
    snapshot: Res<UserSnapshot>,
    mut rng: ResMut<GameRng>,
    cleanups: Query<&WasteCleanup>,
) {
    for command in clicks.read() {
        let HomeCommand::CleanWaste(object) = command;

        let Some(stored) = snapshot.0.home_objects.iter().find(|candidate| candidate.same_object(object)) else {
            debug!(object = ?object.id, "Ignoring click on an object that is gone");
            continue;
        };
        if !stored.is_waste() {
            debug!(object = ?stored.id, kind = %stored.kind, "Ignoring click on non-waste object");
            continue;
        }
        if cleanups.iter().any(|cleanup| cleanup.object.same_object(stored)) {
            continue;
        }

        let side = if rng.0.random::<bool>() { 1.0 } else { -1.0 };
        trace!(object = ?stored.id, side, "Flinging waste");
        commands.spawn(WasteCleanup::fling(stored.clone(), side));
    }
}

/// Hatches eggs whose incubation has elapsed.
pub fn hatching_system(
    mut commands: Commands,
    now: Res<Now>,
    config: Res<PetConfig>,
    snapshot: Res<UserSnapshot>,
    mut pets: Query<(Entity, &PetTag, &mut HatchGuard)>,
    mut events: EventWriter<HomeEvent>,
) {
    for (entity, tag, mut guard) in pets.iter_mut() {
        let Some(pet) = snapshot.pet(tag.0) else { continue };
        if guard.is_settled() {
            continue;
        }

        if let Some(patch) = guard.check(pet, now.0, config.incubation_ms) {
            info!(pet = %pet.id, name = %pet.name, line = pet.evolution.line, "Egg hatched");
            commands.entity(entity).insert(HatchAnimation::new(config.hatch_animation_ms));
            events.write(HomeEvent::PetChanged {
                pet: pet.id,
                patch,
                reason: PatchReason::Hatched,
            });
        }
    }
}

/// Decays needs of hatched pets against the wall clock.
pub fn degradation_system(
    now: Res<Now>,
    config: Res<PetConfig>,
    snapshot: Res<UserSnapshot>,
    mut pets: Query<(&PetTag, &mut Degradation)>,
    mut events: EventWriter<HomeEvent>,
) {
    let rates = DecayRates::from(&*config);
    for (tag, mut degradation) in pets.iter_mut() {
        let Some(pet) = snapshot.pet(tag.0).filter(|pet| !pet.is_egg()) else {
            continue;
        };

        let Some(step) = degradation.tick(pet, now.0, config.degradation_interval_ms, rates) else {
            continue;
        };
        let reason = match &step {
            DegradationStep::Seeded(_) => PatchReason::Stamped,
            DegradationStep::Decayed { hours, .. } => {
                debug!(pet = %pet.id, hours = *hours, "Needs decayed");
                PatchReason::Degraded
            }
        };
        events.write(HomeEvent::PetChanged {
            pet: pet.id,
            patch: step.into_patch(),
            reason,
        });
    }
}

pub fn hatch_animation_system(mut commands: Commands, dt: Res<DeltaTime>, mut query: Query<(Entity, &mut HatchAnimation)>) {
    for (entity, mut animation) in query.iter_mut() {
        if animation.advance(dt.0) {
            commands.entity(entity).remove::<HatchAnimation>();
        }
    }
}

/// Random-walks hatched pets.
pub fn wander_system(
    dt: Res<DeltaTime>,
    now: Res<Now>,
    config: Res<MovementConfig>,
    snapshot: Res<UserSnapshot>,
    mut rng: ResMut<GameRng>,
    mut pets: Query<(&PetTag, &mut Wander)>,
) {
    for (tag, mut wander) in pets.iter_mut() {
        if snapshot.pet(tag.0).is_none_or(|pet| pet.is_egg()) {
            continue;
        }

        if wander.step(dt.0, now.0, &config, &mut rng.0) == WanderStep::Turned {
            trace!(pet = %tag.0, facing = wander.facing.as_ref(), "Pet turned");
        }
    }
}

/// Drops waste under hatched pets on a fixed interval.
pub fn waste_drop_system(
    now: Res<Now>,
    config: Res<PetConfig>,
    snapshot: Res<UserSnapshot>,
    mut pets: Query<(&PetTag, &Wander, &mut WasteTimer)>,
    mut events: EventWriter<HomeEvent>,
) {
    if !config.waste_enabled {
        return;
    }

    for (tag, wander, mut timer) in pets.iter_mut() {
        if snapshot.pet(tag.0).is_none_or(|pet| pet.is_egg()) {
            continue;
        }

        if timer.tick(now.0, config.waste_interval_ms) {
            let object = HomeObject::waste(wander.position.x, wander.position.y);
            debug!(pet = %tag.0, x = object.x, y = object.y, "Waste dropped");
            events.write(HomeEvent::WasteDropped { pet: tag.0, object });
        }
    }
}

/// Advances fling animations and reports finished ones for removal.
pub fn waste_cleanup_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    mut cleanups: Query<(Entity, &mut WasteCleanup)>,
    mut events: EventWriter<HomeEvent>,
) {
    for (entity, mut cleanup) in cleanups.iter_mut() {
        if cleanup.advance(dt.0) {
            events.write(HomeEvent::WasteCleared(cleanup.object.clone()));
            commands.entity(entity).despawn();
        }
    }
}

/// Picks the sprite frame for every mounted pet.
pub fn pet_sprite_system(
    dt: Res<DeltaTime>,
    sprites: Res<Sprites>,
    snapshot: Res<UserSnapshot>,
    mut pets: Query<(&PetTag, &Wander, &mut FrameFlipper, &mut PetSprite)>,
) {
    for (tag, wander, mut flipper, mut sprite) in pets.iter_mut() {
        let Some(pet) = snapshot.pet(tag.0) else { continue };
        let frame = flipper.tick(dt.0);
        sprite.0 = sprites.0.resolve(pet.evolution, wander.facing, frame);
    }
}
