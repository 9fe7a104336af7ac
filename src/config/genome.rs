use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::RecombinationMethod;
use crate::error::EvolvableError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    pub length: usize,
    /// Carry per-gene step sizes and evolve them during mutation
    pub self_adaptive: bool,
    pub initial_sigma: f64,
    pub gene_method: RecombinationMethod,
    pub sigma_method: RecombinationMethod,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            length: 3,
            self_adaptive: true,
            initial_sigma: 0.1,
            gene_method: RecombinationMethod::Discrete,
            sigma_method: RecombinationMethod::Intermediate,
        }
    }
}

impl GenomeConfig {
    /// Step size for spontaneous genomes, if they carry any
    pub fn spontaneous_sigma(&self) -> Option<f64> {
        self.self_adaptive.then_some(self.initial_sigma)
    }
}

impl ConfigSection for GenomeConfig {
    fn section_name() -> &'static str {
        "genome"
    }

    fn validate(&self) -> Result<(), EvolvableError> {
        if self.length == 0 {
            return Err(EvolvableError::Configuration(
                "Genome length must be at least 1".to_string(),
            ));
        }
        check_unit_interval("Initial sigma", self.initial_sigma)
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Genome".to_string(),
            fields: vec![
                FieldManifest::new("length", "integer", serde_json::json!(3), "Genes per genome")
                    .bounded(1.0, 10000.0),
                FieldManifest::new(
                    "self_adaptive",
                    "boolean",
                    serde_json::json!(true),
                    "Evolve per-gene mutation step sizes",
                ),
                FieldManifest::new(
                    "initial_sigma",
                    "float",
                    serde_json::json!(0.1),
                    "Starting mutation step size",
                )
                .bounded(0.0, 1.0),
                FieldManifest::new(
                    "gene_method",
                    "enum",
                    serde_json::json!("Discrete"),
                    "Recombination of genes: Crossover, Discrete, Fixed or Intermediate",
                ),
                FieldManifest::new(
                    "sigma_method",
                    "enum",
                    serde_json::json!("Intermediate"),
                    "Recombination of step sizes",
                ),
            ],
        }
    }
}
