use crate::config::{AppConfig, ConfigSection, EvolutionConfig, GenomeConfig, PopulationMode};
use crate::engines::generation::{
    fitness_ledger::{select_parent, FitnessLedger, FitnessReport},
    genome::Genome,
    operators::{spontaneous_genome, Mutator, Recombiner},
    progress::PopulationObserver,
};
use crate::error::{EvolvableError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How a genome came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomeOrigin {
    Spontaneous,
    Recombined { mutated: bool },
}

/// A new genome, tagged with the generation it belongs to (`None` in steady state)
#[derive(Debug, Clone)]
pub struct SpawnedGenome {
    pub genome: Genome,
    pub generation: Option<usize>,
    pub origin: GenomeOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStats {
    pub generation: Option<usize>,
    pub spawn_count: usize,
    pub reports_received: usize,
    pub cumulative_fitness: f64,
    pub reports_on_file: usize,
}

enum Cohorts {
    Generational {
        current: usize,
        created: BTreeMap<usize, usize>,
    },
    SteadyState {
        population_size: usize,
        expiry_age: f64,
    },
}

/// Owns the population lifecycle: decides when a genome may be created, breeds it
/// from fitness-weighted parents, and advances generations as feedback arrives.
///
/// The manager is driven entirely from outside. A scheduler calls [`tick`] once per
/// time step; whoever embodies a spawned genome calls [`report_fitness`] once, when
/// that individual's life ends. Reproduction stalls (but never blocks) until enough
/// reports have come back.
///
/// [`tick`]: PopulationManager::tick
/// [`report_fitness`]: PopulationManager::report_fitness
pub struct PopulationManager {
    genome_config: GenomeConfig,
    config: EvolutionConfig,
    recombiner: Recombiner,
    mutator: Mutator,
    ledger: FitnessLedger,
    cohorts: Cohorts,
    rng: StdRng,
    elapsed: f64,
    last_spawn_check: f64,
    spawn_count: usize,
    observers: Vec<Box<dyn PopulationObserver>>,
}

impl PopulationManager {
    pub fn new(genome_config: GenomeConfig, config: EvolutionConfig) -> Result<Self> {
        genome_config.validate()?;
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut ledger = FitnessLedger::new();
        let cohorts = match config.mode {
            PopulationMode::Generational => {
                ledger.open_generation(0);
                Cohorts::Generational {
                    current: 0,
                    created: BTreeMap::from([(0, 0)]),
                }
            }
            PopulationMode::SteadyState {
                population_size,
                expiry_age,
            } => Cohorts::SteadyState {
                population_size,
                expiry_age,
            },
        };

        Ok(Self {
            recombiner: Recombiner::new(
                genome_config.gene_method,
                genome_config.sigma_method,
                genome_config.initial_sigma,
            ),
            mutator: Mutator::new(genome_config.initial_sigma),
            genome_config,
            config,
            ledger,
            cohorts,
            rng,
            elapsed: 0.0,
            last_spawn_check: 0.0,
            spawn_count: 0,
            observers: Vec::new(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.genome.clone(), config.evolution.clone())
    }

    pub fn add_observer(&mut self, observer: Box<dyn PopulationObserver>) {
        self.observers.push(observer);
    }

    /// Advance the spawn clock by `delta_time` seconds.
    ///
    /// Once more than `spawn_interval` has passed since the last check, the
    /// manager either creates a genome (if spawning is allowed) or tries to close
    /// the current generation.
    pub fn tick(&mut self, delta_time: f64) -> Result<Option<SpawnedGenome>> {
        self.elapsed += delta_time;
        if self.elapsed <= self.last_spawn_check + self.config.spawn_interval {
            return Ok(None);
        }
        self.last_spawn_check = self.elapsed;

        if self.can_spawn() {
            self.create_genome().map(Some)
        } else {
            self.close_generation();
            Ok(None)
        }
    }

    /// Whether the current generation may create another genome.
    ///
    /// Generation `g > 0` additionally waits on generation `g - 1`: for every one
    /// of its individuals to report when waiting for whole generations, otherwise
    /// for at least `mu` reports.
    pub fn can_spawn(&self) -> bool {
        match &self.cohorts {
            Cohorts::Generational { current, created } => {
                let g = *current;
                let made = created.get(&g).copied().unwrap_or(0);
                made < self.config.lambda && (g == 0 || self.generation_ready(g - 1))
            }
            Cohorts::SteadyState { .. } => true,
        }
    }

    fn generation_ready(&self, generation: usize) -> bool {
        let reports = self.ledger.generation_len(generation);
        if self.config.wait_for_whole_generation {
            reports >= self.created_in(generation)
        } else {
            reports >= self.config.mu
        }
    }

    /// Advance to the next generation if the current one has reached `lambda`.
    ///
    /// Returns whether a new generation was opened. Reports older than the
    /// generation just closed are no longer needed for breeding and are dropped.
    pub fn close_generation(&mut self) -> bool {
        let (current, created) = match &mut self.cohorts {
            Cohorts::Generational { current, created } => (current, created),
            Cohorts::SteadyState { .. } => return false,
        };

        let closing = *current;
        if created.get(&closing).copied().unwrap_or(0) < self.config.lambda {
            return false;
        }

        let next = closing + 1;
        *current = next;
        created.insert(next, 0);
        created.retain(|&g, _| g >= closing);

        self.ledger.open_generation(next);
        let consumed = self.ledger.consume_before(closing);
        log::info!(
            "Generation {} closed, generation {} opened ({} old reports consumed)",
            closing, next, consumed
        );
        for observer in self.observers.iter_mut() {
            observer.on_generation_opened(next);
        }
        true
    }

    /// Create one genome for the current generation (or the steady-state pool).
    ///
    /// Generation 0, and a `spontaneous_generation_rate` share of later ones, get a
    /// random genome. Otherwise two parents are drawn by fitness from the previous
    /// generation, recombined, and the child mutated with `mutation_rate`.
    pub fn create_genome(&mut self) -> Result<SpawnedGenome> {
        let (genome, origin, generation) = match self.cohorts {
            Cohorts::Generational { current, .. } => {
                let (genome, origin) = if current == 0
                    || self.rng.gen::<f64>() < self.config.spontaneous_generation_rate
                {
                    (self.spontaneous(), GenomeOrigin::Spontaneous)
                } else {
                    let pool = self.generation_pool(current - 1)?;
                    self.breed(&pool)?
                };
                (genome, origin, Some(current))
            }
            Cohorts::SteadyState {
                population_size,
                expiry_age,
            } => {
                self.ledger.expire(self.elapsed, expiry_age);
                let (genome, origin) = if self.ledger.pool_len() < population_size {
                    (self.spontaneous(), GenomeOrigin::Spontaneous)
                } else {
                    let pool = self.ledger.pool_most_fit(population_size);
                    self.breed(&pool)?
                };
                (genome, origin, None)
            }
        };

        self.spawn_count += 1;
        let created = match &mut self.cohorts {
            Cohorts::Generational { current, created } => {
                let count = created.entry(*current).or_insert(0);
                *count += 1;
                *count
            }
            Cohorts::SteadyState { .. } => self.spawn_count,
        };

        log::trace!("Created {:?} genome {:?}", origin, genome.genes());
        for observer in self.observers.iter_mut() {
            observer.on_genome_created(generation, origin, created);
        }

        Ok(SpawnedGenome {
            genome,
            generation,
            origin,
        })
    }

    fn spontaneous(&mut self) -> Genome {
        spontaneous_genome(
            self.genome_config.length,
            self.genome_config.spontaneous_sigma(),
            &mut self.rng,
        )
    }

    /// Candidate parents from `generation`, fittest first
    fn generation_pool(&mut self, generation: usize) -> Result<Vec<FitnessReport>> {
        if self.config.wait_for_whole_generation {
            Ok(self.ledger.sorted_generation(generation)?.to_vec())
        } else {
            self.ledger.most_fit(generation, self.config.mu)
        }
    }

    fn breed(&mut self, pool: &[FitnessReport]) -> Result<(Genome, GenomeOrigin)> {
        let mother = select_parent(pool, &mut self.rng).ok_or(EvolvableError::EmptyParentPool)?;
        let father = select_parent(pool, &mut self.rng).ok_or(EvolvableError::EmptyParentPool)?;

        let mut child = self
            .recombiner
            .recombine(&mother.genome, &father.genome, &mut self.rng);

        let mutated = self.rng.gen::<f64>() < self.config.mutation_rate;
        if mutated {
            self.mutator.mutate(&mut child, &mut self.rng);
        }
        Ok((child, GenomeOrigin::Recombined { mutated }))
    }

    /// Record the final fitness of an individual.
    ///
    /// Generational managers require the individual's generation tag; steady-state
    /// managers require none. Returns `Ok(false)` if the report arrived after its
    /// generation was consumed and was therefore discarded. NaN and infinite fitness
    /// values are rejected with `InvalidFitness`.
    pub fn report_fitness(&mut self, fitness: f64, genome: Arc<Genome>, generation: Option<usize>) -> Result<bool> {
        match (&self.cohorts, generation) {
            (Cohorts::Generational { .. }, None) => {
                return Err(EvolvableError::ModeMismatch(
                    "generational population needs a generation tag".to_string(),
                ))
            }
            (Cohorts::SteadyState { .. }, Some(g)) => {
                return Err(EvolvableError::ModeMismatch(format!(
                    "steady-state population got a report tagged with generation {}",
                    g
                )))
            }
            _ => {}
        }

        let stored = self.ledger.record(FitnessReport {
            fitness,
            genome,
            timestamp: self.elapsed,
            generation,
        })?;

        let on_file = self.ledger.reports_on_file();
        for observer in self.observers.iter_mut() {
            observer.on_fitness_reported(generation, fitness, on_file);
        }
        Ok(stored)
    }

    pub fn current_generation(&self) -> Option<usize> {
        match &self.cohorts {
            Cohorts::Generational { current, .. } => Some(*current),
            Cohorts::SteadyState { .. } => None,
        }
    }

    pub fn created_in(&self, generation: usize) -> usize {
        match &self.cohorts {
            Cohorts::Generational { created, .. } => created.get(&generation).copied().unwrap_or(0),
            Cohorts::SteadyState { .. } => 0,
        }
    }

    pub fn reports_in(&self, generation: usize) -> usize {
        self.ledger.generation_len(generation)
    }

    /// How long an individual should live before reporting
    pub fn lifespan(&self) -> f64 {
        match self.cohorts {
            Cohorts::Generational { .. } => self.config.spawn_interval * self.config.mu as f64,
            Cohorts::SteadyState { population_size, .. } => {
                self.config.spawn_interval * population_size as f64
            }
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ledger(&self) -> &FitnessLedger {
        &self.ledger
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats {
            generation: self.current_generation(),
            spawn_count: self.spawn_count,
            reports_received: self.ledger.reports_received(),
            cumulative_fitness: self.ledger.cumulative_fitness(),
            reports_on_file: self.ledger.reports_on_file(),
        }
    }
}
