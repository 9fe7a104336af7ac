pub mod config;
pub mod engines;
pub mod error;
pub mod simulation;

pub use error::{EvolvableError, Result};
