use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolvableError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported recombination method: {0}")]
    UnsupportedMethod(String),

    #[error("Unknown generation: {0}")]
    UnknownGeneration(usize),

    #[error("Parent pool is empty")]
    EmptyParentPool,

    #[error("Fitness must be finite, got {0}")]
    InvalidFitness(f64),

    #[error("Population mode mismatch: {0}")]
    ModeMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EvolvableError>;
