use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::evaluation::AggregationPolicy;
use crate::error::EvolvableError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Fitness earned per second of life
    pub age_multiplier: f64,
    pub default_policy: AggregationPolicy,
    /// Per-component overrides, keyed by lowercase component name
    pub policies: HashMap<String, AggregationPolicy>,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert("target_distance".to_string(), AggregationPolicy::Max);
        Self {
            age_multiplier: 1.0,
            default_policy: AggregationPolicy::Sum,
            policies,
        }
    }
}

impl FitnessConfig {
    pub fn policy_for(&self, component: &str) -> AggregationPolicy {
        self.policies
            .get(component)
            .copied()
            .unwrap_or(self.default_policy)
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), EvolvableError> {
        if !self.age_multiplier.is_finite() {
            return Err(EvolvableError::Configuration(
                "Age multiplier must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Fitness".to_string(),
            fields: vec![
                FieldManifest::new(
                    "age_multiplier",
                    "float",
                    serde_json::json!(1.0),
                    "Fitness earned per second survived",
                ),
                FieldManifest::new(
                    "default_policy",
                    "enum",
                    serde_json::json!("Sum"),
                    "How repeated observations combine: Sum or Max",
                ),
            ],
        }
    }
}
