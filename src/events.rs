use bevy_ecs::prelude::*;

use crate::data::{HomeObject, PetId, PetPatch};
use crate::runner::{LaneInput, RunnerEntityId, RunnerEntityKind, RunnerStage, StageCommand};

/// Player input for the home scene.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum HomeCommand {
    /// A waste object was clicked.
    CleanWaste(HomeObject),
}

/// Player input for a runner session.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerCommand {
    Stage(StageCommand),
    Lane(LaneInput),
}

impl From<StageCommand> for RunnerCommand {
    fn from(command: StageCommand) -> Self {
        RunnerCommand::Stage(command)
    }
}

impl From<LaneInput> for RunnerCommand {
    fn from(input: LaneInput) -> Self {
        RunnerCommand::Lane(input)
    }
}

/// Why a pet patch was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::AsRefStr)]
pub enum PatchReason {
    Hatched,
    Degraded,
    Stamped,
}

/// Effects of a home scene tick, applied to the user document by the caller.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum HomeEvent {
    PetChanged {
        pet: PetId,
        patch: PetPatch,
        reason: PatchReason,
    },
    WasteDropped {
        pet: PetId,
        object: HomeObject,
    },
    WasteCleared(HomeObject),
}

/// Things that happened during a runner tick.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum RunnerEvent {
    Collected {
        id: RunnerEntityId,
        kind: RunnerEntityKind,
        score: u32,
    },
    Crashed {
        id: RunnerEntityId,
        score: u32,
    },
    StageChanged {
        from: RunnerStage,
        to: RunnerStage,
    },
}
