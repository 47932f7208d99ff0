use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use tracing::info;

use crate::config::RunnerConfig;
use crate::constants::animation::RUNNER_FLIP_INTERVAL;
use crate::data::{PetId, UserData};
use crate::error::{GameError, GameResult};
use crate::events::{RunnerCommand, RunnerEvent};
use crate::runner::{RunnerEntity, RunnerState};
use crate::sprite::{Facing, FrameFlipper, SpriteKey, SpriteTable};
use crate::systems::runner::{
    avatar_animation_system, despawn_passed_system, forward_motion_system, is_running, lane_smoothing_system,
    runner_collision_system, runner_command_system, spawn_system,
};
use crate::systems::{DeltaTime, GameRng, RunnerAvatar, Spawner};

/// One play-through of the endless runner, from mount to exit.
///
/// Dropping the session discards every entity and all session state.
pub struct RunnerSession {
    pub world: World,
    pub schedule: Schedule,
}

impl RunnerSession {
    /// Starts a session for `pet`, which must exist in `user`.
    pub fn new(
        user: &UserData,
        pet: PetId,
        config: &RunnerConfig,
        sprites: &SpriteTable,
        rng: GameRng,
    ) -> GameResult<RunnerSession> {
        let runner = user.pet(pet).ok_or(GameError::MissingPet(pet))?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<RunnerCommand>(&mut world);
        EventRegistry::register_event::<RunnerEvent>(&mut world);

        world.insert_resource(config.clone());
        world.insert_resource(RunnerState::new(pet));
        world.insert_resource(Spawner::default());
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(rng);
        // Seen from behind while running away from the camera
        world.insert_resource(RunnerAvatar {
            flipper: FrameFlipper::new(RUNNER_FLIP_INTERVAL),
            sprite: sprites.resolve(runner.evolution, Facing::Up, 0),
        });

        schedule.add_systems(
            (
                runner_command_system,
                (
                    spawn_system,
                    forward_motion_system,
                    lane_smoothing_system,
                    runner_collision_system,
                    despawn_passed_system,
                )
                    .chain()
                    .run_if(is_running),
                avatar_animation_system,
            )
                .chain(),
        );

        info!(pet = %pet, name = %runner.name, "Runner session mounted");
        Ok(RunnerSession { world, schedule })
    }

    /// Queues input for the next tick.
    pub fn send(&mut self, command: impl Into<RunnerCommand>) {
        self.world.resource_mut::<Events<RunnerCommand>>().send(command.into());
    }

    /// Advances one frame. `delta` must already be clamped.
    pub fn tick(&mut self, delta: f32) -> Vec<RunnerEvent> {
        self.world.insert_resource(DeltaTime(delta));
        self.schedule.run(&mut self.world);

        self.world.resource_mut::<Events<RunnerCommand>>().clear();
        self.world.resource_mut::<Events<RunnerEvent>>().drain().collect()
    }

    pub fn state(&self) -> &RunnerState {
        self.world.resource::<RunnerState>()
    }

    pub fn pet(&self) -> PetId {
        self.state().pet
    }

    /// Live coins and trees, oldest first.
    pub fn entities(&mut self) -> Vec<RunnerEntity> {
        let mut query = self.world.query::<&RunnerEntity>();
        let mut entities: Vec<RunnerEntity> = query.iter(&self.world).copied().collect();
        entities.sort_by_key(|entity| entity.id);
        entities
    }

    /// Inserts an entity directly. Used to stage scenarios.
    pub fn spawn_entity(&mut self, entity: RunnerEntity) {
        self.world.spawn(entity);
    }

    pub fn avatar(&self) -> SpriteKey {
        self.world.resource::<RunnerAvatar>().sprite
    }
}
