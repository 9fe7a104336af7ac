use crate::engines::evaluation::FitnessAccumulator;
use crate::engines::generation::{Genome, GenomeOrigin, SpawnedGenome};
use std::sync::Arc;

/// A genome embodied in the world for a limited lifespan
#[derive(Debug, Clone)]
pub struct Individual {
    pub id: u64,
    pub genome: Arc<Genome>,
    pub generation: Option<usize>,
    pub origin: GenomeOrigin,
    pub age: f64,
    pub lifespan: f64,
    pub fitness: FitnessAccumulator,
}

impl Individual {
    pub fn new(id: u64, spawned: SpawnedGenome, lifespan: f64) -> Self {
        Self {
            id,
            genome: Arc::new(spawned.genome),
            generation: spawned.generation,
            origin: spawned.origin,
            age: 0.0,
            lifespan,
            fitness: FitnessAccumulator::new(),
        }
    }

    pub fn grow(&mut self, delta_time: f64) {
        self.age += delta_time;
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.lifespan
    }
}
