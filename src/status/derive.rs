use crate::registry::{Direction, StatusTone, ThresholdConfig};

/// Map a raw value to a tone. Comparisons are inclusive on the favorable
/// side: a value sitting exactly on `warning` is good, exactly on
/// `critical` is warning.
pub fn derive_status(value: f64, thresholds: &ThresholdConfig) -> StatusTone {
    match thresholds.direction {
        Direction::HigherIsBetter => {
            if value >= thresholds.warning {
                StatusTone::Good
            } else if value >= thresholds.critical {
                StatusTone::Warning
            } else {
                StatusTone::Critical
            }
        }
        Direction::LowerIsBetter => {
            if value <= thresholds.warning {
                StatusTone::Good
            } else if value <= thresholds.critical {
                StatusTone::Warning
            } else {
                StatusTone::Critical
            }
        }
    }
}
