use tracing::{debug, info, warn};

use crate::clock::{clamp_delta, Clock};
use crate::config::Config;
use crate::data::{AuthResponse, HomeObject, PetId, PetPatch};
use crate::error::{GameError, GameResult};
use crate::events::{HomeCommand, HomeEvent, RunnerCommand, RunnerEvent};
use crate::formatter;
use crate::game::{HomeScene, RunnerSession};
use crate::gateway::{GatewayCall, GatewayResponse, PersistRequest};
use crate::sprite::SpriteTable;
use crate::store::{AppState, Page, ResponseOutcome};
use crate::systems::GameRng;

/// The client core: application state plus whichever scene is on screen.
///
/// The embedding application calls [`App::frame`] once per rendered frame, hands the
/// returned requests to its transport, and feeds the answers back through
/// [`App::handle_response`].
pub struct App<C: Clock> {
    state: AppState,
    clock: C,
    config: Config,
    sprites: SpriteTable,
    rng: GameRng,
    home: HomeScene,
    runner: Option<RunnerSession>,
}

impl<C: Clock> App<C> {
    pub fn new(config: Config, clock: C, sprites: SpriteTable, mut rng: GameRng) -> Self {
        let home = HomeScene::new(&config, sprites.clone(), rng.fork());
        Self {
            state: AppState::new(),
            clock,
            config,
            sprites,
            rng,
            home,
            runner: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn home(&mut self) -> &mut HomeScene {
        &mut self.home
    }

    pub fn runner(&mut self) -> Option<&mut RunnerSession> {
        self.runner.as_mut()
    }

    pub fn login(&mut self, response: AuthResponse) {
        self.state.login(response);
        self.runner = None;
        self.home = HomeScene::new(&self.config, self.sprites.clone(), self.rng.fork());
    }

    pub fn logout(&mut self) {
        self.state.logout();
        self.runner = None;
    }

    /// Moves to a page. Pet pages validate the pet and redirect home if it is missing.
    pub fn navigate_to(&mut self, page: Page, pet: Option<PetId>) -> GameResult<()> {
        match (page, pet) {
            (Page::Minigame, Some(pet)) => self.start_minigame(pet),
            (Page::PetSummary, Some(pet)) => self.open_pet(pet),
            (page, None) if page.needs_pet() => {
                self.redirect_home();
                Err(GameError::InvalidState(format!("{} requires a pet", page.as_ref())))
            }
            (page, _) => {
                self.runner = None;
                self.state.navigate_to(page, None);
                Ok(())
            }
        }
    }

    /// Shows the summary page of one pet.
    pub fn open_pet(&mut self, pet: PetId) -> GameResult<()> {
        self.runner = None;
        if self.state.user().and_then(|user| user.pet(pet)).is_none() {
            self.redirect_home();
            return Err(GameError::MissingPet(pet));
        }
        self.state.navigate_to(Page::PetSummary, Some(pet));
        Ok(())
    }

    /// Mounts a fresh runner session for `pet`.
    pub fn start_minigame(&mut self, pet: PetId) -> GameResult<()> {
        let Some(user) = self.state.user() else {
            self.redirect_home();
            return Err(GameError::MissingPet(pet));
        };

        match RunnerSession::new(user, pet, &self.config.runner, &self.sprites, self.rng.fork()) {
            Ok(session) => {
                self.runner = Some(session);
                self.state.navigate_to(Page::Minigame, Some(pet));
                Ok(())
            }
            Err(error) => {
                warn!(%error, "Cannot start the runner");
                self.redirect_home();
                Err(error)
            }
        }
    }

    /// Tears down the runner and returns to the pet's summary.
    pub fn exit_minigame(&mut self) {
        let Some(session) = self.runner.take() else { return };
        let pet = session.pet();
        info!(pet = %pet, score = session.state().score, "Leaving the runner");
        if self.open_pet(pet).is_err() {
            debug!(pet = %pet, "Pet vanished while playing");
        }
    }

    fn redirect_home(&mut self) {
        self.runner = None;
        self.state.navigate_to(Page::Home, None);
    }

    pub fn runner_command(&mut self, command: impl Into<RunnerCommand>) {
        match self.runner.as_mut() {
            Some(session) => session.send(command),
            None => debug!("Runner input without a session"),
        }
    }

    /// Starts cleaning up a clicked waste object.
    pub fn clean_waste(&mut self, object: HomeObject) {
        self.home.send(HomeCommand::CleanWaste(object));
    }

    pub fn rename_pet(&mut self, pet: PetId, name: &str) -> GameResult<PersistRequest> {
        self.state.update_pet(pet, &PetPatch::rename(name))
    }

    /// Advances the visible scene by one frame.
    ///
    /// Returns the writes the caller must submit, at most one document write per frame.
    pub fn frame(&mut self, raw_delta: f32) -> Vec<PersistRequest> {
        formatter::increment_frame();
        let delta = clamp_delta(raw_delta);
        let now = self.clock.now_ms();

        self.ensure_active_pet();

        match self.state.navigation().page {
            Page::Home | Page::PetSummary => {
                let Some(snapshot) = self.state.snapshot() else {
                    return Vec::new();
                };
                let effects = self.home.tick(snapshot, delta, now);
                coalesce_writes(self.apply_home_effects(effects))
            }
            Page::Minigame => {
                if let Some(session) = self.runner.as_mut() {
                    for event in session.tick(delta) {
                        if let RunnerEvent::Collected { kind, score, .. } = event {
                            debug!(kind = kind.as_ref(), score, "Runner pickup");
                        }
                    }
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn apply_home_effects(&mut self, effects: Vec<HomeEvent>) -> Vec<PersistRequest> {
        let mut requests = Vec::with_capacity(effects.len());
        for effect in effects {
            let result = match effect {
                HomeEvent::PetChanged { pet, patch, reason } => {
                    debug!(pet = %pet, reason = reason.as_ref(), "Applying pet patch");
                    self.state.update_pet(pet, &patch).map(Some)
                }
                HomeEvent::WasteDropped { object, .. } => self.state.add_home_object(object).map(Some),
                HomeEvent::WasteCleared(object) => self.state.delete_home_object(&object),
            };

            match result {
                Ok(Some(request)) => requests.push(request),
                Ok(None) => {}
                Err(error) => warn!(%error, "Dropping scene effect"),
            }
        }
        requests
    }

    fn ensure_active_pet(&mut self) {
        let page = self.state.navigation().page;
        if self.state.resolve_active_pet().is_none() && page.needs_pet() {
            self.runner = None;
        }
    }

    pub fn handle_response(&mut self, response: GatewayResponse) -> ResponseOutcome {
        let outcome = self.state.handle_response(response);
        if outcome == ResponseOutcome::Applied {
            self.ensure_active_pet();
        }
        outcome
    }

    pub fn retry_unconfirmed(&mut self) -> Vec<PersistRequest> {
        self.state.retry_unconfirmed()
    }
}

/// Keeps every delete but only the newest document write.
///
/// Each document write carries the whole document, so the newest one subsumes the rest.
pub fn coalesce_writes(requests: Vec<PersistRequest>) -> Vec<PersistRequest> {
    let last_put = requests
        .iter()
        .rposition(|request| matches!(request.call, GatewayCall::PutUserData { .. }));
    requests
        .into_iter()
        .enumerate()
        .filter(|(index, request)| {
            !matches!(request.call, GatewayCall::PutUserData { .. }) || Some(*index) == last_put
        })
        .map(|(_, request)| request)
        .collect()
}
