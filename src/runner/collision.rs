use std::collections::HashSet;

use crate::constants::collider;
use crate::runner::{RunnerEntity, RunnerEntityId, RunnerEntityKind};

/// Lateral half-extent and the open forward band `(near, far)` of each collider.
fn collider(kind: RunnerEntityKind) -> (f32, f32, f32) {
    match kind {
        RunnerEntityKind::Coin => (collider::COIN_X, -collider::COIN_Z, collider::COIN_Z),
        RunnerEntityKind::LargeCoin => (collider::LARGE_COIN_X, -collider::LARGE_COIN_Z, collider::LARGE_COIN_Z),
        RunnerEntityKind::Tree => (collider::TREE_X, collider::TREE_Z_NEAR, collider::TREE_Z_FAR),
    }
}

/// Whether an entity of `kind` at offset `(dx, dz)` from the player overlaps it.
pub fn overlaps(kind: RunnerEntityKind, dx: f32, dz: f32) -> bool {
    sweep_overlaps(kind, dx, dz, dz)
}

/// Whether an entity that moved from `from_z` to `to_z` this frame touched the player.
///
/// The whole swept interval is tested, so a fast entity cannot skip over the band.
pub fn sweep_overlaps(kind: RunnerEntityKind, dx: f32, from_z: f32, to_z: f32) -> bool {
    let (half_width, near, far) = collider(kind);
    let (lo, hi) = if from_z <= to_z { (from_z, to_z) } else { (to_z, from_z) };
    dx.abs() < half_width && lo < far && hi > near
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Collected { id: RunnerEntityId, kind: RunnerEntityKind, value: u32 },
    Crashed { id: RunnerEntityId },
}

/// Collision checks for one frame.
///
/// Each collectible is reported at most once per pass, even if it is checked again
/// before its removal has been applied.
#[derive(Debug, Default)]
pub struct CollisionPass {
    consumed: HashSet<RunnerEntityId>,
}

impl CollisionPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, player_x: f32, entity: &RunnerEntity) -> Option<Hit> {
        // The player sits at z = 0
        if !sweep_overlaps(entity.kind, entity.x() - player_x, entity.prev_z, entity.z) {
            return None;
        }

        if entity.kind.is_collectible() {
            if !self.consumed.insert(entity.id) {
                return None;
            }
            Some(Hit::Collected {
                id: entity.id,
                kind: entity.kind,
                value: entity.kind.value(),
            })
        } else {
            Some(Hit::Crashed { id: entity.id })
        }
    }

    pub fn is_consumed(&self, id: RunnerEntityId) -> bool {
        self.consumed.contains(&id)
    }
}
