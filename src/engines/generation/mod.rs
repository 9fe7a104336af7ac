pub mod genome;
pub mod section;
pub mod gene_consumer;
pub mod operators;
pub mod fitness_ledger;
pub mod population;
pub mod progress;

pub use genome::Genome;
pub use section::{Section, Segment};
pub use gene_consumer::{GenomeCursor, GenomeReader};
pub use operators::{spontaneous_genome, uniform_between, Mutator, RecombinationMethod, Recombiner};
pub use fitness_ledger::{select_parent, FitnessLedger, FitnessReport};
pub use population::{GenomeOrigin, PopulationManager, PopulationStats, SpawnedGenome};
pub use progress::{ChannelObserver, LoggingObserver, PopulationEvent, PopulationObserver};
