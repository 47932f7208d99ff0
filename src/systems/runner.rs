use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::constants::runner::{DESPAWN_Z, SPAWN_Z};
use crate::events::{RunnerCommand, RunnerEvent};
use crate::runner::{
    current_speed, plan_spawns, smooth_toward, spawn_interval, CollisionPass, Hit, RunnerEntity, RunnerStage, RunnerState,
    StageCommand,
};
use crate::systems::components::{DeltaTime, GameRng, RunnerAvatar, Spawner};

/// Run condition for everything that only advances during play.
pub fn is_running(state: Res<RunnerState>) -> bool {
    state.stage.is_running()
}

/// Applies stage commands and lane input.
pub fn runner_command_system(
    mut commands: Commands,
    mut input: EventReader<RunnerCommand>,
    mut state: ResMut<RunnerState>,
    mut spawner: ResMut<Spawner>,
    entities: Query<Entity, With<RunnerEntity>>,
    mut events: EventWriter<RunnerEvent>,
) {
    for command in input.read() {
        match *command {
            RunnerCommand::Stage(stage_command) => {
                let from = state.stage;
                let Some(to) = from.apply(stage_command) else {
                    debug!(stage = from.as_ref(), command = stage_command.as_ref(), "Ignoring stage command");
                    continue;
                };

                if stage_command == StageCommand::Restart {
                    for entity in entities.iter() {
                        commands.entity(entity).despawn();
                    }
                    state.reset();
                    spawner.reset();
                }

                state.stage = to;
                info!(from = from.as_ref(), to = to.as_ref(), score = state.score, "Runner stage changed");
                events.write(RunnerEvent::StageChanged { from, to });
            }
            RunnerCommand::Lane(lane_input) => {
                if !state.stage.accepts_lane_input() {
                    continue;
                }
                state.lane = lane_input.apply(state.lane);
            }
        }
    }
}

/// Rolls spawn cycles at a rate that scales with speed.
pub fn spawn_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<RunnerConfig>,
    state: Res<RunnerState>,
    mut spawner: ResMut<Spawner>,
    mut rng: ResMut<GameRng>,
) {
    let speed = current_speed(config.base_speed, config.speed_increment_per_point, state.score);
    let interval = spawn_interval(config.base_spawn_interval, speed, config.base_speed);
    if !spawner.scheduler.advance(dt.0, interval) {
        return;
    }

    for (kind, lane) in plan_spawns(&mut rng.0, state.score, &config) {
        let id = spawner.next_id();
        commands.spawn(RunnerEntity::new(id, kind, lane, SPAWN_Z));
    }
}

/// Scrolls entities toward the player.
pub fn forward_motion_system(
    dt: Res<DeltaTime>,
    config: Res<RunnerConfig>,
    state: Res<RunnerState>,
    mut entities: Query<&mut RunnerEntity>,
) {
    let speed = current_speed(config.base_speed, config.speed_increment_per_point, state.score);
    for mut runner_entity in entities.iter_mut() {
        runner_entity.prev_z = runner_entity.z;
        runner_entity.z += speed * dt.0;
    }
}

pub fn lane_smoothing_system(dt: Res<DeltaTime>, config: Res<RunnerConfig>, mut state: ResMut<RunnerState>) {
    let target = state.target_x();
    state.player_x = smooth_toward(state.player_x, target, config.lane_smoothing, dt.0);
}

/// Collects coins and ends the run on a tree.
pub fn runner_collision_system(
    mut commands: Commands,
    mut state: ResMut<RunnerState>,
    entities: Query<(Entity, &RunnerEntity)>,
    mut events: EventWriter<RunnerEvent>,
) {
    let mut candidates: Vec<(Entity, &RunnerEntity)> = entities.iter().collect();
    candidates.sort_by_key(|(_, runner_entity)| runner_entity.id);

    let mut pass = CollisionPass::new();
    for (entity, runner_entity) in candidates {
        match pass.check(state.player_x, runner_entity) {
            None => {}
            Some(Hit::Collected { id, kind, value }) => {
                state.award(value);
                commands.entity(entity).despawn();
                debug!(kind = kind.as_ref(), value, score = state.score, "Collected");
                events.write(RunnerEvent::Collected {
                    id,
                    kind,
                    score: state.score,
                });
            }
            Some(Hit::Crashed { id }) => {
                let from = state.stage;
                state.stage = RunnerStage::GameOver;
                info!(score = state.score, "Hit a tree, game over");
                events.write(RunnerEvent::Crashed { id, score: state.score });
                events.write(RunnerEvent::StageChanged {
                    from,
                    to: RunnerStage::GameOver,
                });
                break;
            }
        }
    }
}

/// Drops entities that scrolled past the camera, after they had their collision check.
///
/// Nothing is removed once the run is over, so the tree that ended it stays in place.
pub fn despawn_passed_system(mut commands: Commands, state: Res<RunnerState>, entities: Query<(Entity, &RunnerEntity)>) {
    if !state.stage.is_running() {
        return;
    }
    for (entity, runner_entity) in entities.iter() {
        if runner_entity.z > DESPAWN_Z {
            commands.entity(entity).despawn();
        }
    }
}

/// Flips the avatar's running frames during play.
pub fn avatar_animation_system(dt: Res<DeltaTime>, state: Res<RunnerState>, mut avatar: ResMut<RunnerAvatar>) {
    if !state.stage.is_running() {
        return;
    }
    let frame = avatar.flipper.tick(dt.0);
    avatar.sprite.frame = frame;
}
