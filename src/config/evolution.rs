use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvolvableError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Minimum parent pool before a generation may breed from its predecessor
    pub mu: usize,
    /// Maximum genomes created per generation
    pub lambda: usize,
    pub wait_for_whole_generation: bool,
    pub mutation_rate: f64,
    pub spontaneous_generation_rate: f64,
    pub mode: PopulationMode,
    /// Seconds between spawn checks
    pub spawn_interval: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PopulationMode {
    Generational,
    SteadyState { population_size: usize, expiry_age: f64 },
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mu: 20,
            lambda: 100,
            wait_for_whole_generation: false,
            mutation_rate: 0.20,
            spontaneous_generation_rate: 0.05,
            mode: PopulationMode::Generational,
            spawn_interval: 0.5,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvolvableError> {
        check_unit_interval("Mutation rate", self.mutation_rate)?;
        check_unit_interval("Spontaneous generation rate", self.spontaneous_generation_rate)?;
        if !(self.spawn_interval >= 0.0) {
            return Err(EvolvableError::Configuration(
                "Spawn interval must not be negative".to_string(),
            ));
        }
        match self.mode {
            PopulationMode::Generational => {
                if self.mu == 0 || self.lambda == 0 {
                    return Err(EvolvableError::Configuration(
                        "Mu and lambda must be at least 1".to_string(),
                    ));
                }
                if self.mu > self.lambda {
                    return Err(EvolvableError::Configuration(format!(
                        "Mu ({}) must not exceed lambda ({})",
                        self.mu, self.lambda
                    )));
                }
            }
            PopulationMode::SteadyState { population_size, expiry_age } => {
                if population_size == 0 {
                    return Err(EvolvableError::Configuration(
                        "Steady-state population size must be at least 1".to_string(),
                    ));
                }
                if !(expiry_age > 0.0) {
                    return Err(EvolvableError::Configuration(
                        "Steady-state expiry age must be positive".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new("mu", "integer", serde_json::json!(20), "Minimum parent pool size")
                    .bounded(1.0, 10000.0),
                FieldManifest::new("lambda", "integer", serde_json::json!(100), "Genomes per generation")
                    .bounded(1.0, 10000.0),
                FieldManifest::new(
                    "wait_for_whole_generation",
                    "boolean",
                    serde_json::json!(false),
                    "Breed only once every individual of the previous generation has reported",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    serde_json::json!(0.20),
                    "Probability a recombined child is mutated",
                )
                .bounded(0.0, 1.0),
                FieldManifest::new(
                    "spontaneous_generation_rate",
                    "float",
                    serde_json::json!(0.05),
                    "Probability a genome is random instead of bred",
                )
                .bounded(0.0, 1.0),
                FieldManifest::new(
                    "spawn_interval",
                    "float",
                    serde_json::json!(0.5),
                    "Seconds between spawn checks",
                )
                .bounded(0.0, 3600.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rates_must_be_probabilities() {
        let config = EvolutionConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvolutionConfig {
            spontaneous_generation_rate: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mu_bounded_by_lambda() {
        let config = EvolutionConfig {
            mu: 10,
            lambda: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_steady_state_limits() {
        let mut config = EvolutionConfig {
            mode: PopulationMode::SteadyState {
                population_size: 0,
                expiry_age: 10.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.mode = PopulationMode::SteadyState {
            population_size: 10,
            expiry_age: 0.0,
        };
        assert!(config.validate().is_err());

        config.mode = PopulationMode::SteadyState {
            population_size: 10,
            expiry_age: 30.0,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_manifest_lists_fields() {
        let manifest = EvolutionConfig::default().to_manifest();
        assert_eq!(manifest.section, "Evolution");
        assert!(manifest.fields.iter().any(|f| f.name == "lambda"));
    }
}
