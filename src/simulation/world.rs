use super::individual::Individual;
use crate::config::FitnessConfig;
use crate::engines::generation::{PopulationManager, Section};
use crate::error::{EvolvableError, Result};

/// Scores live individuals every tick under a named fitness component
pub trait FitnessSource: Send {
    fn component(&self) -> &str;
    fn observe(&self, individual: &Individual) -> Option<f64>;
}

/// Rewards individuals whose decoded position lies close to a target point.
///
/// The position is read from the genome through `phenotype`; the score is
/// `distance_multiplier / (1 + distance) - age * age_penalty`, so the same
/// closeness is worth less the longer it took to reach.
pub struct TargetProximity {
    pub target: Vec<f64>,
    pub phenotype: Section,
    pub distance_multiplier: f64,
    pub age_penalty: f64,
}

impl TargetProximity {
    pub const COMPONENT: &'static str = "target_distance";

    pub fn new(target: Vec<f64>) -> Self {
        Self {
            target,
            phenotype: Section::default(),
            distance_multiplier: 100.0,
            age_penalty: 1.0,
        }
    }

    pub fn distance(&self, individual: &Individual) -> f64 {
        individual
            .genome
            .reader(&self.phenotype)
            .zip(&self.target)
            .map(|(position, target)| (position - target).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl FitnessSource for TargetProximity {
    fn component(&self) -> &str {
        Self::COMPONENT
    }

    fn observe(&self, individual: &Individual) -> Option<f64> {
        let closeness = 1.0 / (1.0 + self.distance(individual));
        Some(closeness * self.distance_multiplier - individual.age * self.age_penalty)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub spawned: Option<u64>,
    pub retired: usize,
    /// Retired individuals whose report arrived after their generation was consumed
    pub discarded: usize,
}

/// Minimal host for a population: embodies spawned genomes, ages them, lets the
/// fitness sources score them and reports each one when its life ends.
pub struct World {
    population: PopulationManager,
    fitness: FitnessConfig,
    sources: Vec<Box<dyn FitnessSource>>,
    living: Vec<Individual>,
    next_id: u64,
}

impl World {
    pub fn new(population: PopulationManager, fitness: FitnessConfig) -> Self {
        Self {
            population,
            fitness,
            sources: Vec::new(),
            living: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_source(&mut self, source: Box<dyn FitnessSource>) {
        self.sources.push(source);
    }

    pub fn tick(&mut self, delta_time: f64) -> Result<TickOutcome> {
        let mut outcome = TickOutcome::default();

        if let Some(spawned) = self.population.tick(delta_time)? {
            let id = self.next_id;
            self.next_id += 1;
            let lifespan = self.population.lifespan();
            self.living.push(Individual::new(id, spawned, lifespan));
            outcome.spawned = Some(id);
        }

        for individual in self.living.iter_mut() {
            individual.grow(delta_time);
            for source in &self.sources {
                if let Some(value) = source.observe(individual) {
                    let component = source.component();
                    let policy = self.fitness.policy_for(component);
                    individual.fitness.contribute(component, value, policy);
                }
            }
        }

        let (expired, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.living)
            .into_iter()
            .partition(Individual::is_expired);
        self.living = alive;

        for mut individual in expired {
            let total = individual
                .fitness
                .finish(individual.age, self.fitness.age_multiplier);
            let stored = self
                .population
                .report_fitness(total, individual.genome.clone(), individual.generation)?;
            outcome.retired += 1;
            if !stored {
                outcome.discarded += 1;
            }
        }

        Ok(outcome)
    }

    /// Run for `duration` simulated seconds in steps of `delta_time`
    pub fn run(&mut self, duration: f64, delta_time: f64) -> Result<()> {
        if !(delta_time > 0.0 && delta_time.is_finite()) || !(duration >= 0.0 && duration.is_finite()) {
            return Err(EvolvableError::Configuration(format!(
                "Cannot run for {}s in steps of {}s",
                duration, delta_time
            )));
        }
        let steps = (duration / delta_time).ceil() as usize;
        for _ in 0..steps {
            self.tick(delta_time)?;
        }
        Ok(())
    }

    pub fn population(&self) -> &PopulationManager {
        &self.population
    }

    pub fn living(&self) -> &[Individual] {
        &self.living
    }
}
