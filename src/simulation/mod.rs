pub mod individual;
pub mod world;

pub use individual::Individual;
pub use world::{FitnessSource, TargetProximity, TickOutcome, World};
