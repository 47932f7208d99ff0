//! Typed sprite lookup for pets.
//!
//! Every pet variant ships a front-facing pair of frames; directional pairs are
//! optional. Lookups never fail for a registered variant: a missing direction
//! resolves to the front pair, and eggs always face front.

use std::collections::{HashMap, HashSet};

use bevy_ecs::component::Component;
use strum_macros::{AsRefStr, EnumIter};

use crate::data::EvolutionId;

/// The four sprite facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter)]
pub enum Facing {
    #[default]
    #[strum(serialize = "F")]
    Front,
    #[strum(serialize = "U")]
    Up,
    #[strum(serialize = "R")]
    Right,
    #[strum(serialize = "L")]
    Left,
}

/// One frame of one pet variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub evolution: EvolutionId,
    pub facing: Facing,
    /// 0 or 1.
    pub frame: u8,
}

impl SpriteKey {
    /// Asset path of the frame, relative to the sprite root.
    pub fn path(&self) -> String {
        format!(
            "pets/{}/{}/{}_{}.png",
            self.evolution.stage,
            self.evolution.line,
            self.facing.as_ref(),
            self.frame
        )
    }
}

/// The set of directional frame pairs that exist for each variant.
#[derive(Debug, Default, Clone)]
pub struct SpriteTable {
    variants: HashMap<EvolutionId, HashSet<Facing>>,
}

impl SpriteTable {
    /// Registers a variant. The front pair is implied.
    pub fn register(&mut self, evolution: EvolutionId, facings: impl IntoIterator<Item = Facing>) {
        let entry = self.variants.entry(evolution).or_default();
        entry.insert(Facing::Front);
        entry.extend(facings);
    }

    pub fn contains(&self, evolution: EvolutionId) -> bool {
        self.variants.contains_key(&evolution)
    }

    /// Resolves the frame to draw, falling back to the front pair.
    pub fn resolve(&self, evolution: EvolutionId, facing: Facing, frame: u8) -> SpriteKey {
        let frame = frame.min(1);
        let facing = if evolution.is_egg() {
            Facing::Front
        } else {
            match self.variants.get(&evolution) {
                Some(facings) if facings.contains(&facing) => facing,
                _ => Facing::Front,
            }
        };

        SpriteKey {
            evolution,
            facing,
            frame,
        }
    }
}

/// Alternates between frame 0 and 1 on a fixed interval.
#[derive(Component, Debug, Clone, Copy)]
pub struct FrameFlipper {
    pub timer: f32,
    pub interval: f32,
    pub frame: u8,
}

impl FrameFlipper {
    pub fn new(interval: f32) -> Self {
        Self {
            timer: 0.0,
            interval,
            frame: 0,
        }
    }

    /// Advances the timer and returns the current frame.
    pub fn tick(&mut self, delta: f32) -> u8 {
        if self.interval <= 0.0 {
            return self.frame;
        }

        self.timer += delta;
        while self.timer >= self.interval {
            // Keep partial progress toward the next flip
            self.timer -= self.interval;
            self.frame ^= 1;
        }
        self.frame
    }
}
