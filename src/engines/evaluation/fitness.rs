use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Component name for the lifetime term set when an individual retires
pub const AGE_COMPONENT: &str = "age";

/// How repeated observations of one fitness component combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregationPolicy {
    /// Add every contribution to a running total
    #[default]
    Sum,
    /// Keep the best single observation
    Max,
}

impl AggregationPolicy {
    fn combine(self, current: f64, observed: f64) -> f64 {
        match self {
            Self::Sum => current + observed,
            Self::Max => current.max(observed),
        }
    }
}

/// Named partial fitness terms gathered over an individual's life.
///
/// Observers contribute as often as they like; only [`total`](Self::total) (the sum
/// of all components) is ever reported to the population.
#[derive(Debug, Clone, Default)]
pub struct FitnessAccumulator {
    components: BTreeMap<String, f64>,
}

impl FitnessAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contribute(&mut self, component: &str, value: f64, policy: AggregationPolicy) {
        match self.components.get_mut(component) {
            Some(current) => *current = policy.combine(*current, value),
            None => {
                self.components.insert(component.to_string(), value);
            }
        }
    }

    /// Overwrite a component regardless of policy
    pub fn set(&mut self, component: &str, value: f64) {
        self.components.insert(component.to_string(), value);
    }

    pub fn component(&self, component: &str) -> Option<f64> {
        self.components.get(component).copied()
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, f64)> {
        self.components.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn total(&self) -> f64 {
        self.components.values().sum()
    }

    /// Set the age term and return the final total
    pub fn finish(&mut self, age: f64, age_multiplier: f64) -> f64 {
        self.set(AGE_COMPONENT, age * age_multiplier);
        self.total()
    }
}
