//! Headless demo: plays a scripted session against an in-memory server.

use anyhow::{Context, Result};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use varmints::app::App;
use varmints::clock::{Clock, ManualClock, SystemClock};
use varmints::config::Config;
use varmints::constants::MS_PER_HOUR;
use varmints::data::{AuthResponse, EvolutionId, Pet, PetId, UserData};
use varmints::gateway::{LoopbackGateway, PersistRequest, PersistenceGateway};
use varmints::logging::setup_logging;
use varmints::runner::{LaneInput, RunnerEntityKind, RunnerStage, StageCommand};
use varmints::sprite::{Facing, SpriteTable};
use varmints::store::Page;
use varmints::systems::GameRng;

/// How many frames pass between two answers from the in-memory server.
const ROUND_TRIP_FRAMES: u32 = 20;

fn demo_account(now: i64) -> AuthResponse {
    let sprout = Pet::egg(PetId(1), 0, "Sprout", now);
    let mut pebble = Pet::egg(PetId(2), 1, "Pebble", now - 3 * MS_PER_HOUR as i64);
    pebble.evolution = EvolutionId::new(1, 1);
    pebble.last_update = Some(now - 5 * MS_PER_HOUR as i64);
    pebble.hunger = 0.0;
    pebble.happiness = 1.0;

    AuthResponse {
        id: 7,
        username: "demo".into(),
        data: UserData {
            completed_tutorial: true,
            money: 100,
            pets: vec![sprout, pebble],
            ..Default::default()
        },
    }
}

fn demo_sprites() -> SpriteTable {
    let mut sprites = SpriteTable::default();
    for line in 0..2 {
        sprites.register(EvolutionId::new(0, line), []);
        sprites.register(EvolutionId::new(1, line), Facing::iter());
    }
    sprites
}

fn submit_all(gateway: &mut LoopbackGateway, requests: Vec<PersistRequest>) -> Result<()> {
    for request in requests {
        let body = request.call.body()?;
        debug!(
            seq = request.seq.0,
            method = request.call.method().as_ref(),
            path = %request.call.path(),
            bytes = body.as_ref().map_or(0, String::len),
            "Submitting"
        );
        gateway.submit(request);
    }
    Ok(())
}

fn deliver(app: &mut App<ManualClock>, gateway: &mut LoopbackGateway) {
    for response in gateway.flush() {
        let outcome = app.handle_response(response);
        debug!(?outcome, "Response handled");
    }
}

/// Steers away from trees within a short horizon.
fn autopilot(app: &mut App<ManualClock>) -> Option<LaneInput> {
    let session = app.runner()?;
    let lane = session.state().lane;
    let ahead: Vec<_> = session
        .entities()
        .into_iter()
        .filter(|entity| entity.z > -8.0 && entity.z < 0.5)
        .collect();
    let blocked = |lane: usize| {
        ahead
            .iter()
            .any(|entity| entity.lane == lane && entity.kind == RunnerEntityKind::Tree)
    };
    if !blocked(lane) {
        return None;
    }

    [lane.checked_sub(1), Some(lane + 1).filter(|next| *next < 3)]
        .into_iter()
        .flatten()
        .find(|candidate| !blocked(*candidate))
        .map(|candidate| if candidate < lane { LaneInput::Left } else { LaneInput::Right })
}

fn main() -> Result<()> {
    setup_logging();

    let config = Config::load().context("loading configuration")?;
    let demo = config.demo.clone();
    let rng = match demo.seed {
        Some(seed) => GameRng::seeded(seed),
        None => GameRng::from_os(),
    };

    let clock = ManualClock::new(SystemClock.now_ms());
    let account = demo_account(clock.now_ms());
    let mut app = App::new(config, clock, demo_sprites(), rng);
    let mut gateway = LoopbackGateway::new();
    let delta = demo.frame_ms as f32 / 1000.0;

    app.login(account);
    info!(frames = demo.home_frames, "Simulating the home scene");

    for frame in 0..demo.home_frames {
        app.clock().advance(i64::from(demo.frame_ms));
        let requests = app.frame(delta);
        submit_all(&mut gateway, requests)?;

        if frame % ROUND_TRIP_FRAMES == 0 {
            deliver(&mut app, &mut gateway);
        }

        // Clean up stored waste now and then
        if frame % 240 == 120 {
            let stored = app
                .state()
                .user()
                .and_then(|user| user.waste().find(|object| object.id.is_some()).cloned());
            if let Some(object) = stored {
                app.clean_waste(object);
            }
        }
    }
    deliver(&mut app, &mut gateway);

    if let Some(user) = app.state().user() {
        for pet in &user.pets {
            let (hunger, happiness) = pet.needs().percent();
            info!(
                pet = %pet.id,
                name = %pet.name,
                stage = pet.evolution.stage,
                hunger,
                happiness,
                age = %pet.age_label(app.clock().now_ms()),
                "Pet status"
            );
        }
    }

    let runner_pet = PetId(2);
    app.navigate_to(Page::Minigame, Some(runner_pet))?;
    app.runner_command(StageCommand::Start);
    info!(frames = demo.runner_frames, "Playing the runner");

    for _ in 0..demo.runner_frames {
        if let Some(input) = autopilot(&mut app) {
            app.runner_command(input);
        }
        app.clock().advance(i64::from(demo.frame_ms));
        submit_all(&mut gateway, app.frame(delta))?;

        let stage = app.runner().map(|session| session.state().stage);
        if stage == Some(RunnerStage::GameOver) {
            break;
        }
    }

    if let Some(session) = app.runner() {
        info!(score = session.state().score, stage = session.state().stage.as_ref(), "Run finished");
    }
    app.exit_minigame();

    deliver(&mut app, &mut gateway);
    match gateway.stored() {
        Some(stored) => info!(document = %serde_json::to_string(stored)?, "Server copy"),
        None => warn!("The server never received a document"),
    }

    Ok(())
}
