use anyhow::Context;
use evolvable::config::ConfigManager;
use evolvable::engines::generation::{LoggingObserver, PopulationManager};
use evolvable::simulation::{TargetProximity, World};
use std::env;

const TIME_STEP: f64 = 1.0 / 60.0;
const DEFAULT_DURATION: f64 = 300.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // usage: evolvable [config.toml] [seconds]
    let mut args = env::args().skip(1);
    let manager = ConfigManager::new();
    if let Some(path) = args.next() {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?;
    }
    let duration = match args.next() {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("invalid duration '{}'", raw))?,
        None => DEFAULT_DURATION,
    };

    let config = manager.get();
    let mut population = PopulationManager::from_config(&config)?;
    population.add_observer(Box::new(LoggingObserver));

    let mut world = World::new(population, config.fitness.clone());
    world.add_source(Box::new(TargetProximity::new(vec![0.8; config.genome.length])));

    println!("=== Evolvable: {:.0}s simulated ===", duration);
    world.run(duration, TIME_STEP)?;

    let stats = world.population().stats();
    println!("Spawned:          {}", stats.spawn_count);
    println!("Reports received: {}", stats.reports_received);
    println!("Reports on file:  {}", stats.reports_on_file);
    if let Some(generation) = stats.generation {
        println!("Generation:       {}", generation);
    }
    if stats.reports_received > 0 {
        println!(
            "Mean fitness:     {:.4}",
            stats.cumulative_fitness / stats.reports_received as f64
        );
    }
    if let Some(best) = world.population().ledger().best() {
        println!("Best fitness:     {:.4} {:?}", best.fitness, best.genome.genes());
    }

    Ok(())
}
