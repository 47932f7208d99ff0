//! Client-side application state.
//!
//! Holds the optimistic user document, navigation, and the bookkeeping needed to
//! reconcile server responses that may arrive late, out of order, or after the
//! session that issued them has ended.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use strum_macros::AsRefStr;
use tracing::{debug, info, warn};

use crate::data::{AuthResponse, HomeObject, HomeObjectId, PetId, PetPatch, UserData};
use crate::error::{GameError, GameResult, PersistenceError};
use crate::gateway::{GatewayCall, GatewayReply, GatewayResponse, PersistRequest, RequestSeq, SessionId};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum Page {
    #[default]
    MainMenu,
    Home,
    PetSummary,
    Minigame,
}

impl Page {
    /// Whether the page is about one specific pet.
    pub fn needs_pet(self) -> bool {
        matches!(self, Page::PetSummary | Page::Minigame)
    }
}

/// Where the user is, and which pet they are looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    pub page: Page,
    pub active_pet: Option<PetId>,
}

/// Whether the local document is known to match the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Confirmed,
    /// A write is in flight and no failure has been seen since the last confirmation.
    Pending,
    /// A write failed. The optimistic document is kept and can be resent.
    Unconfirmed,
}

/// How a response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    /// Superseded by a later write; the document was left alone.
    Stale,
    /// Issued by a session that has since ended.
    WrongSession,
    Failed,
}

#[derive(Debug, Default)]
pub struct AppState {
    user: Option<Arc<UserData>>,
    navigation: Navigation,
    session: SessionId,
    next_seq: u64,
    /// Sequence number of the newest user-data write.
    latest_write: Option<RequestSeq>,
    /// Deletes issued but not yet confirmed, filtered out of incoming documents.
    pending_deletes: HashSet<HomeObjectId>,
    /// In-flight delete requests by sequence number.
    delete_requests: HashMap<RequestSeq, HomeObjectId>,
    /// Deletes that failed and should be resent on retry.
    failed_deletes: Vec<HomeObjectId>,
    sync: SyncStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session with the document returned by login or registration.
    pub fn login(&mut self, response: AuthResponse) {
        self.session = SessionId(self.session.0 + 1);
        let user = response.into_user_data();
        info!(user_id = user.id, username = %user.username, pets = user.pets.len(), "Logged in");
        self.user = Some(Arc::new(user));
        self.latest_write = None;
        self.pending_deletes.clear();
        self.delete_requests.clear();
        self.failed_deletes.clear();
        self.sync = SyncStatus::Confirmed;
        self.navigation = Navigation {
            page: Page::Home,
            active_pet: None,
        };
    }

    /// Ends the session. Responses to its requests will be ignored.
    pub fn logout(&mut self) {
        self.session = SessionId(self.session.0 + 1);
        self.user = None;
        self.latest_write = None;
        self.pending_deletes.clear();
        self.delete_requests.clear();
        self.failed_deletes.clear();
        self.sync = SyncStatus::Confirmed;
        self.navigation = Navigation::default();
        info!("Logged out");
    }

    pub fn user(&self) -> Option<&UserData> {
        self.user.as_deref()
    }

    /// A cheap handle to the current document snapshot.
    pub fn snapshot(&self) -> Option<Arc<UserData>> {
        self.user.clone()
    }

    pub fn navigation(&self) -> Navigation {
        self.navigation
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync
    }

    pub fn navigate_to(&mut self, page: Page, active_pet: Option<PetId>) {
        debug!(from = self.navigation.page.as_ref(), to = page.as_ref(), pet = ?active_pet, "Navigating");
        self.navigation = Navigation { page, active_pet };
    }

    /// Checks that the active pet still exists, redirecting home if it does not.
    ///
    /// Returns the pet id when the current page may keep showing it.
    pub fn resolve_active_pet(&mut self) -> Option<PetId> {
        let page = self.navigation.page;
        if !page.needs_pet() {
            return self.navigation.active_pet;
        }

        let exists = match (self.navigation.active_pet, self.user()) {
            (Some(id), Some(user)) => user.pet(id).is_some(),
            _ => false,
        };
        if exists {
            return self.navigation.active_pet;
        }

        warn!(page = page.as_ref(), pet = ?self.navigation.active_pet, "Active pet is missing, redirecting home");
        self.navigate_to(Page::Home, None);
        None
    }

    fn next_request(&mut self, call: GatewayCall) -> PersistRequest {
        self.next_seq += 1;
        PersistRequest {
            seq: RequestSeq(self.next_seq),
            session: self.session,
            call,
        }
    }

    /// Applies `mutate` to a fresh copy of the document and returns the write for it.
    ///
    /// Readers holding the previous snapshot keep seeing it unchanged.
    pub fn update_user_data(&mut self, mutate: impl FnOnce(&mut UserData)) -> GameResult<PersistRequest> {
        let user = self.user.as_mut().ok_or(PersistenceError::NoUserData)?;
        mutate(Arc::make_mut(user));
        let call = GatewayCall::PutUserData {
            user_id: user.id,
            document: Arc::clone(user),
        };

        let request = self.next_request(call);
        self.latest_write = Some(request.seq);
        if self.sync == SyncStatus::Confirmed {
            self.sync = SyncStatus::Pending;
        }
        Ok(request)
    }

    /// Merges a patch into one pet.
    pub fn update_pet(&mut self, id: PetId, patch: &PetPatch) -> GameResult<PersistRequest> {
        let user = self.user().ok_or(PersistenceError::NoUserData)?;
        if user.pet(id).is_none() {
            return Err(GameError::MissingPet(id));
        }

        self.update_user_data(|user| {
            if let Some(pet) = user.pet_mut(id) {
                *pet = pet.merged(patch);
            }
        })
    }

    pub fn add_home_object(&mut self, object: HomeObject) -> GameResult<PersistRequest> {
        self.update_user_data(|user| user.home_objects.push(object))
    }

    /// Removes a home object locally.
    ///
    /// Returns the delete call when the object is stored on the server. Objects the
    /// server has not assigned an id to yet only exist locally.
    pub fn delete_home_object(&mut self, object: &HomeObject) -> GameResult<Option<PersistRequest>> {
        let user = self.user.as_mut().ok_or(PersistenceError::NoUserData)?;
        let Some(index) = user.home_objects.iter().position(|candidate| candidate.same_object(object)) else {
            return Err(GameError::InvalidState(format!(
                "home object {:?} is not in the user document",
                object.id
            )));
        };
        let removed = Arc::make_mut(user).home_objects.remove(index);

        Ok(removed.id.map(|id| self.delete_request(id)))
    }

    fn delete_request(&mut self, id: HomeObjectId) -> PersistRequest {
        let request = self.next_request(GatewayCall::DeleteHomeObject { id });
        self.pending_deletes.insert(id);
        self.delete_requests.insert(request.seq, id);
        request
    }

    /// Reconciles a server response with the local document.
    pub fn handle_response(&mut self, response: GatewayResponse) -> ResponseOutcome {
        if response.session != self.session {
            debug!(seq = response.seq.0, session = response.session.0, "Dropping response from an ended session");
            return ResponseOutcome::WrongSession;
        }

        match response.reply {
            GatewayReply::UserData(document) => {
                if self.latest_write != Some(response.seq) {
                    debug!(seq = response.seq.0, latest = ?self.latest_write, "Ignoring superseded user data");
                    return ResponseOutcome::Stale;
                }
                let Some(local) = self.user.as_deref() else {
                    return ResponseOutcome::WrongSession;
                };

                let mut document = document.reconciled_with(local);
                document
                    .home_objects
                    .retain(|object| object.id.is_none_or(|id| !self.pending_deletes.contains(&id)));
                self.user = Some(Arc::new(document));
                // The newest document is stored; only failed deletes can still be outstanding
                if self.failed_deletes.is_empty() {
                    self.sync = SyncStatus::Confirmed;
                }
                debug!(seq = response.seq.0, "Applied server document");
                ResponseOutcome::Applied
            }
            GatewayReply::Deleted => {
                if let Some(id) = self.delete_requests.remove(&response.seq) {
                    self.pending_deletes.remove(&id);
                    debug!(seq = response.seq.0, object = id, "Delete confirmed");
                }
                ResponseOutcome::Applied
            }
            GatewayReply::Failed(reason) => {
                let failed_delete = self.delete_requests.remove(&response.seq);
                // A newer document write carries everything this one did
                if failed_delete.is_none() && self.latest_write != Some(response.seq) {
                    debug!(seq = response.seq.0, latest = ?self.latest_write, %reason, "Ignoring failure of superseded write");
                    return ResponseOutcome::Stale;
                }

                let error = PersistenceError::RequestFailed(reason);
                warn!(seq = response.seq.0, error = %error, "Persistence failed, keeping local state");
                // A failed delete stays filtered out locally until the retry lands
                if let Some(id) = failed_delete {
                    self.failed_deletes.push(id);
                }
                self.sync = SyncStatus::Unconfirmed;
                ResponseOutcome::Failed
            }
        }
    }

    /// Rebuilds the writes needed to bring the server back in line after a failure.
    pub fn retry_unconfirmed(&mut self) -> Vec<PersistRequest> {
        if self.sync != SyncStatus::Unconfirmed {
            return Vec::new();
        }

        let mut requests: Vec<PersistRequest> = std::mem::take(&mut self.failed_deletes)
            .into_iter()
            .map(|id| self.delete_request(id))
            .collect();

        match self.update_user_data(|_| {}) {
            Ok(request) => requests.push(request),
            Err(error) => warn!(%error, "Nothing to retry"),
        }
        self.sync = SyncStatus::Pending;
        info!(count = requests.len(), "Retrying unconfirmed writes");
        requests
    }
}
