use evolvable::config::{AppConfig, EvolutionConfig, FitnessConfig, GenomeConfig, PopulationMode};
use evolvable::engines::generation::{GenomeOrigin, PopulationManager, PopulationObserver};
use evolvable::simulation::{FitnessSource, Individual, TargetProximity, World};
use std::sync::{Arc, Mutex};

const TIME_STEP: f64 = 0.05;

#[derive(Debug, Default)]
struct Tally {
    generations_opened: usize,
    spontaneous: usize,
    recombined: usize,
    mutated: usize,
    reports: usize,
}

/// Counts events so the test can inspect them after the run
struct TallyObserver {
    tally: Arc<Mutex<Tally>>,
}

impl PopulationObserver for TallyObserver {
    fn on_generation_opened(&mut self, _generation: usize) {
        self.tally.lock().unwrap().generations_opened += 1;
    }

    fn on_genome_created(&mut self, _generation: Option<usize>, origin: GenomeOrigin, _created: usize) {
        let mut tally = self.tally.lock().unwrap();
        match origin {
            GenomeOrigin::Spontaneous => tally.spontaneous += 1,
            GenomeOrigin::Recombined { mutated } => {
                tally.recombined += 1;
                if mutated {
                    tally.mutated += 1;
                }
            }
        }
    }

    fn on_fitness_reported(&mut self, _generation: Option<usize>, _fitness: f64, _reports_on_file: usize) {
        self.tally.lock().unwrap().reports += 1;
    }
}

/// Constant bonus, summed every tick
struct Heartbeat;

impl FitnessSource for Heartbeat {
    fn component(&self) -> &str {
        "heartbeat"
    }

    fn observe(&self, _individual: &Individual) -> Option<f64> {
        Some(0.01)
    }
}

fn build_world(mode: PopulationMode, target: Vec<f64>) -> (World, Arc<Mutex<Tally>>) {
    let config = AppConfig {
        genome: GenomeConfig {
            length: target.len(),
            ..Default::default()
        },
        evolution: EvolutionConfig {
            mu: 4,
            lambda: 10,
            spawn_interval: 0.1,
            seed: Some(1234),
            mode,
            ..Default::default()
        },
        fitness: FitnessConfig::default(),
    };

    let tally = Arc::new(Mutex::new(Tally::default()));
    let mut population = PopulationManager::from_config(&config).unwrap();
    population.add_observer(Box::new(TallyObserver { tally: tally.clone() }));

    let mut world = World::new(population, config.fitness.clone());
    world.add_source(Box::new(TargetProximity::new(target)));
    world.add_source(Box::new(Heartbeat));
    (world, tally)
}

fn distance(genes: &[f64], target: &[f64]) -> f64 {
    genes
        .iter()
        .zip(target)
        .map(|(g, t)| (g - t).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[test]
fn test_generational_world_converges_on_target() {
    let target = vec![0.9, 0.9, 0.9];
    let (mut world, tally) = build_world(PopulationMode::Generational, target.clone());

    world.run(60.0, TIME_STEP).expect("simulation failed");

    let stats = world.population().stats();
    println!("{:?}", stats);
    let generation = stats.generation.unwrap();
    assert!(generation >= 10, "only reached generation {}", generation);

    // Every individual either still lives or has reported
    assert_eq!(stats.spawn_count, stats.reports_received + world.living().len());
    assert!(stats.reports_on_file <= stats.reports_received);
    assert!(stats.cumulative_fitness > 0.0);

    let tally = tally.lock().unwrap();
    assert_eq!(tally.generations_opened, generation);
    assert_eq!(tally.spontaneous + tally.recombined, stats.spawn_count);
    assert_eq!(tally.reports, stats.reports_received);
    assert!(tally.recombined > tally.spontaneous);
    assert!(tally.mutated > 0);

    let best = world.population().ledger().best().expect("reports on file");
    let best_distance = distance(best.genome.genes(), &target);
    assert!(best_distance < 0.3, "best genome {:?} is {} from target", best.genome.genes(), best_distance);
    assert!(best.genome.genes().iter().all(|g| (0.0..=1.0).contains(g)));
    assert!(best.genome.sigmas().unwrap().iter().all(|s| (0.0..=1.0).contains(s)));
}

#[test]
fn test_steady_state_world_keeps_breeding() {
    let mode = PopulationMode::SteadyState {
        population_size: 5,
        expiry_age: 10.0,
    };
    let (mut world, tally) = build_world(mode, vec![0.2, 0.7]);

    world.run(30.0, TIME_STEP).expect("simulation failed");

    let stats = world.population().stats();
    assert_eq!(stats.generation, None);
    assert_eq!(stats.spawn_count, stats.reports_received + world.living().len());
    // lifespan is spawn_interval * population_size
    assert!((world.population().lifespan() - 0.5).abs() < 1e-9);
    assert!(world.living().iter().all(|i| i.generation.is_none()));

    let tally = tally.lock().unwrap();
    assert_eq!(tally.generations_opened, 0);
    assert!(tally.spontaneous >= 5);
    assert!(tally.recombined > 0);

    // Only reports younger than the expiry age stay in the pool
    let now = world.population().elapsed();
    let ledger = world.population().ledger();
    assert!(ledger.pool_len() > 0);
    assert_eq!(ledger.reports_on_file(), ledger.pool_len());
    let best = ledger.best().unwrap();
    assert!(now - best.timestamp <= 10.0 + 0.5);
}

#[test]
fn test_single_tick_outcome() {
    let (mut world, _) = build_world(PopulationMode::Generational, vec![0.5]);

    // The first check fires once more than one spawn interval has elapsed
    let first = world.tick(0.06).unwrap();
    assert_eq!(first.spawned, None);
    let second = world.tick(0.06).unwrap();
    assert_eq!(second.spawned, Some(0));
    assert_eq!(world.living().len(), 1);

    let individual = &world.living()[0];
    assert_eq!(individual.generation, Some(0));
    assert_eq!(individual.origin, GenomeOrigin::Spontaneous);
    assert!(individual.fitness.component(TargetProximity::COMPONENT).is_some());
    assert_eq!(individual.fitness.component("heartbeat"), Some(0.01));
}
