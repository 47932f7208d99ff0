#![allow(dead_code)]

use varmints::app::App;
use varmints::clock::ManualClock;
use varmints::config::{Config, RunnerConfig};
use varmints::constants::MS_PER_HOUR;
use varmints::data::{AuthResponse, EvolutionId, HomeObject, Pet, PetId, UserData};
use varmints::game::RunnerSession;
use varmints::runner::{RunnerEntity, RunnerEntityId, RunnerEntityKind};
use varmints::sprite::{Facing, SpriteTable};
use varmints::store::AppState;
use varmints::systems::GameRng;

/// Wall-clock origin used by every test, 2025-01-01T00:00:00Z.
pub const T0: i64 = 1_735_689_600_000;

pub const HOUR_MS: i64 = MS_PER_HOUR as i64;

pub const USER_ID: u64 = 7;

pub fn egg(id: u64, line: u32, created_at: i64) -> Pet {
    Pet::egg(PetId(id), line, format!("Egg {id}"), created_at)
}

pub fn hatched(id: u64, line: u32, last_update: Option<i64>) -> Pet {
    let mut pet = Pet::egg(PetId(id), line, format!("Pet {id}"), T0 - 24 * HOUR_MS);
    pet.evolution = EvolutionId::new(1, line);
    pet.last_update = last_update;
    pet
}

pub fn stored_waste(id: u64, x: f32, y: f32) -> HomeObject {
    HomeObject {
        id: Some(id),
        ..HomeObject::waste(x, y)
    }
}

pub fn user(pets: Vec<Pet>, home_objects: Vec<HomeObject>) -> UserData {
    UserData {
        id: USER_ID,
        username: "tester".into(),
        pets,
        home_objects,
        ..Default::default()
    }
}

pub fn auth(user: UserData) -> AuthResponse {
    AuthResponse {
        id: user.id,
        username: user.username.clone(),
        data: user,
    }
}

pub fn logged_in(user: UserData) -> AppState {
    let mut state = AppState::new();
    state.login(auth(user));
    state
}

pub fn sprites() -> SpriteTable {
    let mut sprites = SpriteTable::default();
    for line in 0..3 {
        sprites.register(EvolutionId::new(0, line), []);
        sprites.register(EvolutionId::new(1, line), [Facing::Up, Facing::Left, Facing::Right]);
    }
    sprites
}

/// A config with waste and random spawns disabled, so scenarios stay deterministic.
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.pet.waste_enabled = false;
    config.runner = quiet_runner();
    config
}

pub fn quiet_runner() -> RunnerConfig {
    RunnerConfig {
        coin_chance: 0.0,
        large_coin_chance: 0.0,
        tree_chance: 0.0,
        ..RunnerConfig::default()
    }
}

pub fn app(config: Config, user: UserData) -> App<ManualClock> {
    let mut app = App::new(config, ManualClock::new(T0), sprites(), GameRng::seeded(42));
    app.login(auth(user));
    app
}

pub fn runner_session(pet: Pet) -> RunnerSession {
    let user = user(vec![pet.clone()], vec![]);
    RunnerSession::new(&user, pet.id, &quiet_runner(), &sprites(), GameRng::seeded(3)).unwrap()
}

pub fn entity(id: u64, kind: RunnerEntityKind, lane: usize, z: f32) -> RunnerEntity {
    RunnerEntity::new(RunnerEntityId(1000 + id), kind, lane, z)
}

pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

pub fn approx32(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 1e-5
}
