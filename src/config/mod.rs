pub mod traits;
pub mod genome;
pub mod evolution;
pub mod fitness;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use genome::GenomeConfig;
pub use evolution::{EvolutionConfig, PopulationMode};
pub use fitness::FitnessConfig;
pub use traits::{ConfigSection, ConfigManifest, FieldManifest};
