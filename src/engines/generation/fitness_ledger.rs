use crate::engines::generation::genome::Genome;
use crate::error::{EvolvableError, Result};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Terminal fitness submitted for one individual
#[derive(Clone, Debug)]
pub struct FitnessReport {
    pub fitness: f64,
    pub genome: Arc<Genome>,
    /// Elapsed simulation time when the report was recorded
    pub timestamp: f64,
    /// `None` for steady-state populations
    pub generation: Option<usize>,
}

fn by_fitness_descending(a: &FitnessReport, b: &FitnessReport) -> Ordering {
    b.fitness.total_cmp(&a.fitness)
}

/// Append-only store of fitness reports.
///
/// Generational populations keep one report list per open generation; lists are
/// dropped when their generation is consumed. Steady-state populations keep a
/// single pool whose entries expire by age.
#[derive(Default)]
pub struct FitnessLedger {
    generations: BTreeMap<usize, Vec<FitnessReport>>,
    pool: Vec<FitnessReport>,
    reports_received: usize,
    cumulative_fitness: f64,
}

impl FitnessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty report list for `generation`
    pub fn open_generation(&mut self, generation: usize) {
        self.generations.entry(generation).or_default();
    }

    /// Drop the report lists of every generation before `generation`
    pub fn consume_before(&mut self, generation: usize) -> usize {
        let kept = self.generations.split_off(&generation);
        let consumed = std::mem::replace(&mut self.generations, kept);
        consumed.values().map(Vec::len).sum()
    }

    /// Record a report.
    ///
    /// Returns `Ok(false)` when the report belongs to a generation that has already
    /// been consumed; such late reports are counted but not stored.
    pub fn record(&mut self, report: FitnessReport) -> Result<bool> {
        let generation = report.generation;
        let fitness = report.fitness;
        if !fitness.is_finite() {
            return Err(EvolvableError::InvalidFitness(fitness));
        }

        let stored = match generation {
            None => {
                self.pool.push(report);
                true
            }
            Some(g) => {
                if let Some(reports) = self.generations.get_mut(&g) {
                    reports.push(report);
                    true
                } else if self.is_consumed(g) {
                    log::warn!("Discarding late fitness report for consumed generation {}", g);
                    false
                } else {
                    return Err(EvolvableError::UnknownGeneration(g));
                }
            }
        };

        self.reports_received += 1;
        self.cumulative_fitness += fitness;
        log::debug!("Recorded fitness {:.4} for generation {:?}", fitness, generation);
        Ok(stored)
    }

    fn is_consumed(&self, generation: usize) -> bool {
        self.generations
            .keys()
            .next()
            .map_or(false, |&oldest| generation < oldest)
    }

    pub fn generation_len(&self, generation: usize) -> usize {
        self.generations.get(&generation).map_or(0, Vec::len)
    }

    /// Every report of `generation`, sorted by descending fitness.
    ///
    /// The stored list is sorted in place; equal fitness keeps arrival order.
    pub fn sorted_generation(&mut self, generation: usize) -> Result<&[FitnessReport]> {
        let reports = self
            .generations
            .get_mut(&generation)
            .ok_or(EvolvableError::UnknownGeneration(generation))?;
        reports.sort_by(by_fitness_descending);
        Ok(reports.as_slice())
    }

    /// The `count` fittest reports of `generation`
    pub fn most_fit(&mut self, generation: usize, count: usize) -> Result<Vec<FitnessReport>> {
        let sorted = self.sorted_generation(generation)?;
        Ok(sorted.iter().take(count).cloned().collect())
    }

    /// Prune pool entries older than `max_age` at time `now`
    pub fn expire(&mut self, now: f64, max_age: f64) -> usize {
        let before = self.pool.len();
        self.pool.retain(|report| now - report.timestamp <= max_age);
        let pruned = before - self.pool.len();
        if pruned > 0 {
            log::debug!("Expired {} fitness reports older than {:.2}", pruned, max_age);
        }
        pruned
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// The `count` fittest entries of the steady-state pool
    pub fn pool_most_fit(&mut self, count: usize) -> Vec<FitnessReport> {
        self.pool.sort_by(by_fitness_descending);
        self.pool.iter().take(count).cloned().collect()
    }

    /// Reports currently held across all generations and the pool
    pub fn reports_on_file(&self) -> usize {
        self.generations.values().map(Vec::len).sum::<usize>() + self.pool.len()
    }

    pub fn reports_received(&self) -> usize {
        self.reports_received
    }

    pub fn cumulative_fitness(&self) -> f64 {
        self.cumulative_fitness
    }

    /// Fittest report still on file
    pub fn best(&self) -> Option<&FitnessReport> {
        self.generations
            .values()
            .flatten()
            .chain(self.pool.iter())
            .min_by(|a, b| by_fitness_descending(a, b))
    }
}

/// Fitness-proportionate (roulette) selection over an ordered pool.
///
/// Draws uniformly in `[0, total)` and returns the first report whose running sum
/// reaches the draw. Negative fitness weighs as zero. If nothing matches, which
/// only floating-point edge cases allow, or the weights overflow, the first report
/// is returned; this biases towards the head of the pool (the fittest, for sorted
/// pools).
pub fn select_parent<'a, R: Rng>(pool: &'a [FitnessReport], rng: &mut R) -> Option<&'a FitnessReport> {
    let first = pool.first()?;
    let total: f64 = pool.iter().map(|r| r.fitness.max(0.0)).sum();

    if !total.is_finite() {
        log::warn!("Fitness total {} is not finite; using first candidate", total);
        return Some(first);
    }
    let draw = if total > 0.0 { rng.gen_range(0.0..total) } else { 0.0 };

    let mut tally = 0.0;
    for report in pool {
        tally += report.fitness.max(0.0);
        if tally >= draw {
            return Some(report);
        }
    }

    log::warn!("Weighted selection found no match for draw {} of {}; using first candidate", draw, total);
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn report(fitness: f64, generation: Option<usize>) -> FitnessReport {
        FitnessReport {
            fitness,
            genome: Arc::new(Genome::from_genes(vec![fitness.clamp(0.0, 1.0)])),
            timestamp: 0.0,
            generation,
        }
    }

    #[test]
    fn test_weighted_selection_favours_fit() {
        let pool = vec![report(99.0, Some(0)), report(1.0, Some(0))];
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let fit = (0..draws)
            .filter(|_| select_parent(&pool, &mut rng).unwrap().fitness == 99.0)
            .count();
        let ratio = fit as f64 / draws as f64;
        assert!(ratio > 0.985 && ratio < 0.995, "ratio {}", ratio);
    }

    #[test]
    fn test_zero_fitness_pool_returns_first() {
        let pool = vec![report(0.0, None), report(0.0, None), report(0.0, None)];
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let chosen = select_parent(&pool, &mut rng).unwrap();
            assert!(std::ptr::eq(chosen, &pool[0]));
        }
    }

    #[test]
    fn test_negative_fitness_never_selected_over_positive() {
        let pool = vec![report(-5.0, None), report(3.0, None)];
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            assert_eq!(select_parent(&pool, &mut rng).unwrap().fitness, 3.0);
        }
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(select_parent(&[], &mut rng).is_none());
    }

    #[test]
    fn test_overflowing_weights_fall_back_to_first() {
        let pool = vec![report(f64::MAX, Some(0)), report(f64::MAX, Some(0))];
        let mut rng = StdRng::seed_from_u64(4);
        let chosen = select_parent(&pool, &mut rng).unwrap();
        assert!(std::ptr::eq(chosen, &pool[0]));
    }

    #[test]
    fn test_non_finite_fitness_is_rejected() {
        let mut ledger = FitnessLedger::new();
        ledger.open_generation(0);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ledger.record(report(bad, Some(0))),
                Err(EvolvableError::InvalidFitness(_))
            ));
            assert!(matches!(
                ledger.record(report(bad, None)),
                Err(EvolvableError::InvalidFitness(_))
            ));
        }
        assert_eq!(ledger.reports_received(), 0);
        assert_eq!(ledger.reports_on_file(), 0);
        assert_eq!(ledger.cumulative_fitness(), 0.0);
    }

    #[test]
    fn test_generation_reports_sorted_descending() {
        let mut ledger = FitnessLedger::new();
        ledger.open_generation(0);
        for f in [3.0, 9.0, 1.0, 5.0] {
            ledger.record(report(f, Some(0))).unwrap();
        }
        let fitness: Vec<f64> = ledger.sorted_generation(0).unwrap().iter().map(|r| r.fitness).collect();
        assert_eq!(fitness, vec![9.0, 5.0, 3.0, 1.0]);

        let top: Vec<f64> = ledger.most_fit(0, 2).unwrap().iter().map(|r| r.fitness).collect();
        assert_eq!(top, vec![9.0, 5.0]);
        assert_eq!(ledger.most_fit(0, 10).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_and_consumed_generations() {
        let mut ledger = FitnessLedger::new();
        ledger.open_generation(0);
        ledger.open_generation(1);
        ledger.open_generation(2);
        assert!(matches!(
            ledger.record(report(1.0, Some(7))),
            Err(EvolvableError::UnknownGeneration(7))
        ));

        ledger.record(report(1.0, Some(0))).unwrap();
        assert_eq!(ledger.consume_before(1), 1);
        assert_eq!(ledger.generation_len(0), 0);
        assert!(!ledger.record(report(2.0, Some(0))).unwrap());
        assert!(ledger.record(report(2.0, Some(1))).unwrap());

        assert_eq!(ledger.reports_received(), 3);
        assert_eq!(ledger.cumulative_fitness(), 5.0);
        assert_eq!(ledger.reports_on_file(), 1);
    }

    #[test]
    fn test_pool_expiry_by_age() {
        let mut ledger = FitnessLedger::new();
        for (fitness, timestamp) in [(1.0, 0.0), (2.0, 5.0), (3.0, 9.0)] {
            let mut r = report(fitness, None);
            r.timestamp = timestamp;
            ledger.record(r).unwrap();
        }
        assert_eq!(ledger.expire(10.0, 6.0), 1);
        assert_eq!(ledger.pool_len(), 2);
        let top: Vec<f64> = ledger.pool_most_fit(5).iter().map(|r| r.fitness).collect();
        assert_eq!(top, vec![3.0, 2.0]);
    }

    #[test]
    fn test_best_report() {
        let mut ledger = FitnessLedger::new();
        assert!(ledger.best().is_none());
        ledger.open_generation(0);
        ledger.record(report(4.0, Some(0))).unwrap();
        ledger.record(report(8.0, Some(0))).unwrap();
        ledger.record(report(6.0, None)).unwrap();
        assert_eq!(ledger.best().unwrap().fitness, 8.0);
    }
}
