pub mod delta;
pub mod derive;
pub mod freshness;

pub use delta::{delta_direction, delta_tone, DeltaDirection, DeltaReading};
pub use derive::derive_status;
pub use freshness::{derive_freshness, FreshnessBucket, FreshnessReading};
