use serde::{Deserialize, Serialize};

use crate::registry::{Direction, StatusTone};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    Up,
    Down,
    Flat,
}

/// A change against a baseline, toned independently of the absolute value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeltaReading {
    pub value: f64,
    pub formatted: String,
    pub direction: DeltaDirection,
    pub tone: StatusTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
}

pub fn delta_direction(delta: f64) -> DeltaDirection {
    if delta > 0.0 {
        DeltaDirection::Up
    } else if delta < 0.0 {
        DeltaDirection::Down
    } else {
        DeltaDirection::Flat
    }
}

/// Deltas are binary good/bad: a move toward the metric's favorable
/// direction is good, any other move is critical, flat is neutral.
pub fn delta_tone(direction: DeltaDirection, metric_direction: Direction) -> StatusTone {
    match (direction, metric_direction) {
        (DeltaDirection::Flat, _) => StatusTone::Neutral,
        (DeltaDirection::Up, Direction::HigherIsBetter)
        | (DeltaDirection::Down, Direction::LowerIsBetter) => StatusTone::Good,
        _ => StatusTone::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_the_sign() {
        assert_eq!(delta_direction(0.5), DeltaDirection::Up);
        assert_eq!(delta_direction(-0.5), DeltaDirection::Down);
        assert_eq!(delta_direction(0.0), DeltaDirection::Flat);
    }

    #[test]
    fn tone_is_good_only_when_the_move_matches_the_favorable_direction() {
        assert_eq!(
            delta_tone(DeltaDirection::Up, Direction::HigherIsBetter),
            StatusTone::Good
        );
        assert_eq!(
            delta_tone(DeltaDirection::Down, Direction::HigherIsBetter),
            StatusTone::Critical
        );
        assert_eq!(
            delta_tone(DeltaDirection::Down, Direction::LowerIsBetter),
            StatusTone::Good
        );
        assert_eq!(
            delta_tone(DeltaDirection::Up, Direction::LowerIsBetter),
            StatusTone::Critical
        );
        assert_eq!(
            delta_tone(DeltaDirection::Flat, Direction::LowerIsBetter),
            StatusTone::Neutral
        );
    }
}
