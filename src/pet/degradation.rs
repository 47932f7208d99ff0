use bevy_ecs::component::Component;

use crate::clock::Millis;
use crate::config::PetConfig;
use crate::constants::MS_PER_HOUR;
use crate::data::{Needs, Pet, PetPatch};

/// Per-hour rates at which needs drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayRates {
    pub hunger_per_hour: f64,
    pub happiness_per_hour: f64,
}

impl From<&PetConfig> for DecayRates {
    fn from(config: &PetConfig) -> Self {
        Self {
            hunger_per_hour: config.hunger_rate_per_hour,
            happiness_per_hour: config.happiness_rate_per_hour,
        }
    }
}

/// Applies `hours` of decay. The result always stays within `[0, 1]`.
pub fn decay_needs(needs: Needs, hours: f64, rates: DecayRates) -> Needs {
    let hours = hours.max(0.0);
    Needs {
        hunger: (needs.hunger + rates.hunger_per_hour * hours).min(1.0),
        happiness: (needs.happiness - rates.happiness_per_hour * hours).max(0.0),
    }
    .clamped()
}

/// What a degradation check decided.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradationStep {
    /// The pet had never been stamped; only `lastUpdate` is written.
    Seeded(PetPatch),
    /// Needs decayed over `hours` of wall-clock time.
    Decayed { patch: PetPatch, hours: f64 },
}

impl DegradationStep {
    pub fn into_patch(self) -> PetPatch {
        match self {
            DegradationStep::Seeded(patch) | DegradationStep::Decayed { patch, .. } => patch,
        }
    }
}

/// Batches needs decay into infrequent steps measured against the wall clock.
///
/// The local timestamp is seeded from the persisted `lastUpdate`, so the first
/// check after the client was closed accounts for the whole gap.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Degradation {
    last_applied: Option<Millis>,
}

impl Degradation {
    pub fn last_applied(&self) -> Option<Millis> {
        self.last_applied
    }

    pub fn tick(&mut self, pet: &Pet, now: Millis, interval_ms: i64, rates: DecayRates) -> Option<DegradationStep> {
        let last = match (self.last_applied, pet.last_update) {
            (Some(last), _) | (None, Some(last)) => last,
            (None, None) => {
                self.last_applied = Some(now);
                return Some(DegradationStep::Seeded(PetPatch {
                    last_update: Some(now),
                    ..Default::default()
                }));
            }
        };
        self.last_applied = Some(last);

        let elapsed = now - last;
        if elapsed <= interval_ms {
            return None;
        }

        let hours = elapsed as f64 / MS_PER_HOUR;
        let needs = decay_needs(pet.needs(), hours, rates);
        self.last_applied = Some(now);

        Some(DegradationStep::Decayed {
            patch: PetPatch {
                hunger: Some(needs.hunger),
                happiness: Some(needs.happiness),
                last_update: Some(now),
                ..Default::default()
            },
            hours,
        })
    }
}
