pub mod clock;
pub mod scoring;

pub use clock::{Clock, FixedClock, SystemClock};
pub use scoring::{ScoringEngine, DEFAULT_HALF_LIFE_DAYS};
