use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{self, pet::MAX_NAME_LENGTH, pet::XP_PER_LEVEL};

/// Server-assigned pet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The (stage, line) pair identifying a pet's life stage and species variant.
///
/// Stage 0 is an unhatched egg. On the wire this is the two-element array `evolution_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct EvolutionId {
    pub stage: u32,
    pub line: u32,
}

impl EvolutionId {
    pub const fn new(stage: u32, line: u32) -> Self {
        Self { stage, line }
    }

    pub const fn is_egg(self) -> bool {
        self.stage == 0
    }

    /// The first hatched stage of the same line.
    pub const fn hatched(self) -> Self {
        if self.stage == 0 {
            Self { stage: 1, line: self.line }
        } else {
            self
        }
    }
}

impl From<[u32; 2]> for EvolutionId {
    fn from([stage, line]: [u32; 2]) -> Self {
        Self { stage, line }
    }
}

impl From<EvolutionId> for [u32; 2] {
    fn from(id: EvolutionId) -> Self {
        [id.stage, id.line]
    }
}

/// Hunger and happiness, both on `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Needs {
    /// 0 is full, 1 is starving.
    pub hunger: f64,
    /// 1 is delighted, 0 is miserable.
    pub happiness: f64,
}

impl Needs {
    pub fn new(hunger: f64, happiness: f64) -> Self {
        Self { hunger, happiness }.clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            hunger: clamp_unit(self.hunger),
            happiness: clamp_unit(self.happiness),
        }
    }

    /// Display percentages, as the status bars show them.
    pub fn percent(self) -> (u8, u8) {
        let to_percent = |value: f64| (clamp_unit(value) * 100.0).round() as u8;
        (to_percent(self.hunger), to_percent(self.happiness))
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One owned creature, as stored in the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    #[serde(rename = "evolution_id", default)]
    pub evolution: EvolutionId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_need")]
    pub hunger: f64,
    #[serde(default = "default_need")]
    pub happiness: f64,
    #[serde(default, deserialize_with = "deserialize_abilities")]
    pub abilities: Vec<String>,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<i64>,
    /// Epoch milliseconds of the last applied degradation step.
    #[serde(rename = "lastUpdate", default)]
    pub last_update: Option<i64>,
}

fn default_level() -> u32 {
    1
}

fn default_need() -> f64 {
    0.5
}

/// Abilities arrive either as a JSON list or as the comma-separated column value.
fn deserialize_abilities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAbilities {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<RawAbilities>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawAbilities::List(list)) => list,
        Some(RawAbilities::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|ability| !ability.is_empty())
            .map(String::from)
            .collect(),
    })
}

impl Pet {
    /// A freshly bought egg of the given line.
    pub fn egg(id: PetId, line: u32, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            evolution: EvolutionId::new(0, line),
            name: truncate_name(&name.into()),
            level: default_level(),
            xp: 0,
            hunger: default_need(),
            happiness: default_need(),
            abilities: Vec::new(),
            created_at: Some(created_at),
            last_update: None,
        }
    }

    pub fn is_egg(&self) -> bool {
        self.evolution.is_egg()
    }

    pub fn needs(&self) -> Needs {
        Needs::new(self.hunger, self.happiness)
    }

    /// Fraction of the way to the next level, capped at 1.
    pub fn xp_progress(&self) -> f32 {
        (self.xp as f32 / XP_PER_LEVEL as f32).min(1.0)
    }

    /// Whether the accumulated experience has reached the level threshold.
    pub fn xp_threshold_reached(&self) -> bool {
        self.xp >= XP_PER_LEVEL
    }

    /// Milliseconds since creation, if the creation time is known.
    pub fn age_ms(&self, now: i64) -> Option<i64> {
        self.created_at.map(|created| (now - created).max(0))
    }

    /// Compact age label: minutes under an hour, hours under a day, then days.
    pub fn age_label(&self, now: i64) -> String {
        let Some(age) = self.age_ms(now).filter(|_| self.created_at != Some(0)) else {
            return "0m".to_string();
        };

        let minutes = age / constants::MS_PER_MINUTE;
        let hours = minutes / 60;
        let days = hours / 24;

        if minutes < 60 {
            format!("{minutes}m")
        } else if hours < 24 {
            format!("{hours}h")
        } else {
            format!("{days}d")
        }
    }

    /// Returns a new snapshot with the patch applied.
    ///
    /// The stage never moves backward and needs are clamped into `[0, 1]`.
    pub fn merged(&self, patch: &PetPatch) -> Pet {
        let mut next = self.clone();
        if let Some(evolution) = patch.evolution {
            if evolution.line == next.evolution.line && evolution.stage >= next.evolution.stage {
                next.evolution = evolution;
            }
        }
        if let Some(name) = &patch.name {
            next.name = truncate_name(name);
        }
        if let Some(hunger) = patch.hunger {
            next.hunger = hunger;
        }
        if let Some(happiness) = patch.happiness {
            next.happiness = happiness;
        }
        if let Some(last_update) = patch.last_update {
            next.last_update = Some(last_update);
        }

        let needs = Needs::new(next.hunger, next.happiness);
        next.hunger = needs.hunger;
        next.happiness = needs.happiness;
        next
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LENGTH).collect()
}

/// A partial update to one pet, merged into a new snapshot of the user document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub evolution: Option<EvolutionId>,
    pub name: Option<String>,
    pub hunger: Option<f64>,
    pub happiness: Option<f64>,
    pub last_update: Option<i64>,
}

impl PetPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(truncate_name(&name.into())),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PetPatch::default()
    }
}
