//! Pure transforms over loaded tables. None of them mutate their input.

pub mod derive;
pub mod normalize;
pub mod pattern;
pub mod resample;
pub mod segment;
pub mod units;

pub use derive::{derive, DerivedStation, ReactiveRatios};
pub use normalize::{normalize_key, strip_unit};
pub use pattern::{cycle_position, fold, Cycle, CyclePattern};
pub use resample::{resample, resample_by, resample_series, Period};
pub use segment::{segment, Band, Segment};
pub use units::EnergyUnit;
