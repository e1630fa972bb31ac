use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::StatusTone;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessBucket {
    Fresh,
    Recent,
    Aging,
    Stale,
}

impl FreshnessBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Recent => "recent",
            Self::Aging => "aging",
            Self::Stale => "stale",
        }
    }

    pub fn tone(self) -> StatusTone {
        match self {
            Self::Fresh => StatusTone::Good,
            Self::Recent => StatusTone::Neutral,
            Self::Aging => StatusTone::Warning,
            Self::Stale => StatusTone::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreshnessReading {
    pub timestamp: DateTime<Utc>,
    pub bucket: FreshnessBucket,
    pub label: String,
    pub tone: StatusTone,
}

/// Boundaries are inclusive on the lower bucket: an age of exactly one hour
/// is still fresh. A timestamp in the future counts as fresh.
pub fn bucket_for_age(age: Duration) -> FreshnessBucket {
    if age <= Duration::hours(1) {
        FreshnessBucket::Fresh
    } else if age <= Duration::days(1) {
        FreshnessBucket::Recent
    } else if age <= Duration::weeks(1) {
        FreshnessBucket::Aging
    } else {
        FreshnessBucket::Stale
    }
}

pub fn derive_freshness(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> FreshnessReading {
    let bucket = bucket_for_age(now - timestamp);
    FreshnessReading {
        timestamp,
        bucket,
        label: bucket.label().to_string(),
        tone: bucket.tone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_are_inclusive_on_the_lower_bucket() {
        assert_eq!(bucket_for_age(Duration::hours(1)), FreshnessBucket::Fresh);
        assert_eq!(
            bucket_for_age(Duration::hours(1) + Duration::milliseconds(1)),
            FreshnessBucket::Recent
        );
        assert_eq!(bucket_for_age(Duration::hours(24)), FreshnessBucket::Recent);
        assert_eq!(
            bucket_for_age(Duration::hours(24) + Duration::milliseconds(1)),
            FreshnessBucket::Aging
        );
        assert_eq!(bucket_for_age(Duration::days(7)), FreshnessBucket::Aging);
        assert_eq!(
            bucket_for_age(Duration::days(7) + Duration::milliseconds(1)),
            FreshnessBucket::Stale
        );
    }

    #[test]
    fn future_timestamps_are_fresh() {
        assert_eq!(bucket_for_age(Duration::minutes(-5)), FreshnessBucket::Fresh);
    }

    #[test]
    fn reading_carries_label_and_tone() {
        let now = Utc::now();
        let reading = derive_freshness(now - Duration::days(2), now);
        assert_eq!(reading.bucket, FreshnessBucket::Aging);
        assert_eq!(reading.label, "aging");
        assert_eq!(reading.tone, StatusTone::Warning);
    }
}
