use crate::constants::runner::LANE_COUNT;

/// A lane change request, from keys or a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneInput {
    Left,
    Right,
}

impl LaneInput {
    /// Maps a keyboard key name. Unrelated keys yield `None`.
    pub fn from_key(key: &str) -> Option<LaneInput> {
        match key {
            "ArrowLeft" | "a" => Some(LaneInput::Left),
            "ArrowRight" | "d" => Some(LaneInput::Right),
            _ => None,
        }
    }

    /// Maps a horizontal swipe, `dx = end_x - start_x` in pixels.
    ///
    /// Swipes no longer than `min_distance` are ignored.
    pub fn from_swipe(dx: f32, min_distance: f32) -> Option<LaneInput> {
        if !dx.is_finite() || dx.abs() <= min_distance {
            return None;
        }
        Some(if dx < 0.0 { LaneInput::Left } else { LaneInput::Right })
    }

    /// The lane after applying this input, clamped to the track.
    pub fn apply(self, lane: usize) -> usize {
        match self {
            LaneInput::Left => lane.saturating_sub(1),
            LaneInput::Right => (lane + 1).min(LANE_COUNT - 1),
        }
    }
}

/// Frame-rate independent exponential approach of `current` toward `target`.
pub fn smooth_toward(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * delta).exp())
}
