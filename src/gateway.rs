//! The persistence boundary.
//!
//! The core never talks to the network. It describes the REST calls it needs as
//! [`PersistRequest`] values, and the embedding application feeds the outcome back
//! as a [`GatewayResponse`].

use std::collections::VecDeque;
use std::sync::Arc;

use strum_macros::AsRefStr;
use tracing::{debug, trace};

use crate::data::{AuthResponse, Credentials, HomeObjectId, UserData};
use crate::error::{AuthError, GameError, GameResult};

/// Monotonic per-client request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RequestSeq(pub u64);

/// Generation of the logged-in session; bumped on login and logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
    Delete,
}

/// One call against the storage API.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// `PUT /userdata/{user_id}` with the whole document.
    PutUserData { user_id: u64, document: Arc<UserData> },
    /// `DELETE /homeobject/{id}`.
    DeleteHomeObject { id: HomeObjectId },
}

impl GatewayCall {
    pub fn method(&self) -> Method {
        match self {
            GatewayCall::PutUserData { .. } => Method::Put,
            GatewayCall::DeleteHomeObject { .. } => Method::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            GatewayCall::PutUserData { user_id, .. } => format!("/userdata/{user_id}"),
            GatewayCall::DeleteHomeObject { id } => format!("/homeobject/{id}"),
        }
    }

    /// JSON body, if the call carries one.
    pub fn body(&self) -> GameResult<Option<String>> {
        match self {
            GatewayCall::PutUserData { document, .. } => Ok(Some(serde_json::to_string(document.as_ref())?)),
            GatewayCall::DeleteHomeObject { .. } => Ok(None),
        }
    }
}

/// A call tagged with enough context to reconcile its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    pub seq: RequestSeq,
    pub session: SessionId,
    pub call: GatewayCall,
}

/// What the server said about a request.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
    /// The stored document, as returned by `PUT /userdata`.
    UserData(UserData),
    /// The home object was deleted.
    Deleted,
    /// Transport failure or non-success status.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub seq: RequestSeq,
    pub session: SessionId,
    pub reply: GatewayReply,
}

impl GatewayResponse {
    pub fn to(request: &PersistRequest, reply: GatewayReply) -> Self {
        Self {
            seq: request.seq,
            session: request.session,
            reply,
        }
    }
}

/// Where persist requests go.
pub trait PersistenceGateway {
    fn submit(&mut self, request: PersistRequest);
}

/// A gateway that only records what was submitted.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub submitted: Vec<PersistRequest>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<PersistRequest> {
        std::mem::take(&mut self.submitted)
    }
}

impl PersistenceGateway for RecordingGateway {
    fn submit(&mut self, request: PersistRequest) {
        trace!(seq = request.seq.0, method = request.call.method().as_ref(), path = %request.call.path(), "Recorded request");
        self.submitted.push(request);
    }
}

/// An in-memory stand-in for the storage server.
///
/// Stores documents as they arrive, assigns ids to new home objects, and answers
/// every request in submission order when [`LoopbackGateway::flush`] is called.
#[derive(Debug, Default)]
pub struct LoopbackGateway {
    stored: Option<UserData>,
    queue: VecDeque<PersistRequest>,
    next_object_id: HomeObjectId,
    /// Sequence numbers that should fail instead of succeed.
    pub fail: Vec<RequestSeq>,
}

impl LoopbackGateway {
    pub fn new() -> Self {
        Self {
            next_object_id: 1,
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Option<&UserData> {
        self.stored.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Answers every queued request.
    pub fn flush(&mut self) -> Vec<GatewayResponse> {
        let mut responses = Vec::with_capacity(self.queue.len());
        while let Some(request) = self.queue.pop_front() {
            let reply = self.answer(&request);
            responses.push(GatewayResponse::to(&request, reply));
        }
        responses
    }

    fn answer(&mut self, request: &PersistRequest) -> GatewayReply {
        if self.fail.contains(&request.seq) {
            return GatewayReply::Failed(format!("injected failure for request {}", request.seq.0));
        }

        match &request.call {
            GatewayCall::PutUserData { document, .. } => {
                let mut stored = UserData::clone(document);
                for object in stored.home_objects.iter_mut().filter(|object| object.id.is_none()) {
                    object.id = Some(self.next_object_id);
                    self.next_object_id += 1;
                }
                self.stored = Some(stored.clone());
                GatewayReply::UserData(stored)
            }
            GatewayCall::DeleteHomeObject { id } => {
                if let Some(stored) = self.stored.as_mut() {
                    stored.home_objects.retain(|object| object.id != Some(*id));
                }
                GatewayReply::Deleted
            }
        }
    }
}

impl PersistenceGateway for LoopbackGateway {
    fn submit(&mut self, request: PersistRequest) {
        debug!(seq = request.seq.0, path = %request.call.path(), "Queued request");
        self.queue.push_back(request);
    }
}

/// `POST /login` or `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Login(Credentials),
    Register(Credentials),
}

impl AuthCall {
    pub fn method(&self) -> Method {
        Method::Post
    }

    pub fn path(&self) -> &'static str {
        match self {
            AuthCall::Login(_) => "/login",
            AuthCall::Register(_) => "/register",
        }
    }

    pub fn body(&self) -> GameResult<String> {
        let (AuthCall::Login(credentials) | AuthCall::Register(credentials)) = self;
        Ok(serde_json::to_string(credentials)?)
    }

    /// Interprets the server's answer to this call.
    pub fn parse_response(&self, status: u16, body: &str) -> GameResult<AuthResponse> {
        if (200..300).contains(&status) {
            Ok(serde_json::from_str(body)?)
        } else {
            Err(GameError::Auth(AuthError::from_status(status)))
        }
    }
}
