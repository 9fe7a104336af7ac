pub mod fitness;

pub use fitness::{AggregationPolicy, FitnessAccumulator, AGE_COMPONENT};
