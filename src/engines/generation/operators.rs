use crate::engines::generation::genome::{clamp01, Genome};
use crate::error::EvolvableError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a child's value at one position is derived from its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecombinationMethod {
    /// Mother before the crossover point, father from it onwards
    Crossover,
    /// Each position taken from a parent chosen 50/50
    Discrete,
    /// Clone of the mother
    Fixed,
    /// Uniform draw between the two parents' values
    Intermediate,
}

impl FromStr for RecombinationMethod {
    type Err = EvolvableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crossover" => Ok(Self::Crossover),
            "discrete" => Ok(Self::Discrete),
            "fixed" => Ok(Self::Fixed),
            "intermediate" => Ok(Self::Intermediate),
            other => Err(EvolvableError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for RecombinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Crossover => "crossover",
            Self::Discrete => "discrete",
            Self::Fixed => "fixed",
            Self::Intermediate => "intermediate",
        };
        f.write_str(name)
    }
}

/// Uniform draw from the closed interval spanned by `a` and `b`, in either order
pub fn uniform_between<R: Rng>(rng: &mut R, a: f64, b: f64) -> f64 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if low == high {
        return low;
    }
    rng.gen_range(low..=high)
}

/// Two-parent recombination with independent method selectors for genes and
/// step sizes.
#[derive(Debug, Clone)]
pub struct Recombiner {
    pub gene_method: RecombinationMethod,
    pub sigma_method: RecombinationMethod,
    /// Step size for child positions neither parent has a sigma for
    pub initial_sigma: f64,
}

impl Recombiner {
    pub fn new(gene_method: RecombinationMethod, sigma_method: RecombinationMethod, initial_sigma: f64) -> Self {
        Self {
            gene_method,
            sigma_method,
            initial_sigma,
        }
    }

    /// Child of `mother` and `father`.
    ///
    /// The child is as long as the father under gene crossover and as long as the
    /// mother otherwise. One crossover point is drawn per call and shared by gene
    /// and sigma recombination. The child carries step sizes iff either parent does.
    pub fn recombine<R: Rng>(&self, mother: &Genome, father: &Genome, rng: &mut R) -> Genome {
        let shortest = mother.len().min(father.len());
        let point = if shortest == 0 { 0 } else { rng.gen_range(0..shortest) };
        self.recombine_at(mother, father, point, rng)
    }

    pub(crate) fn recombine_at<R: Rng>(
        &self,
        mother: &Genome,
        father: &Genome,
        point: usize,
        rng: &mut R,
    ) -> Genome {
        let genes = recombine_genes(self.gene_method, mother.genes(), father.genes(), point, rng);

        match (mother.sigmas(), father.sigmas()) {
            (None, None) => Genome::from_genes(genes),
            (m, f) => {
                let sigmas = recombine_sigmas(
                    self.sigma_method,
                    m.unwrap_or(&[]),
                    f.unwrap_or(&[]),
                    genes.len(),
                    point,
                    self.initial_sigma,
                    rng,
                );
                Genome::with_sigmas(genes, sigmas, self.initial_sigma)
            }
        }
    }
}

fn recombine_genes<R: Rng>(
    method: RecombinationMethod,
    mother: &[f64],
    father: &[f64],
    point: usize,
    rng: &mut R,
) -> Vec<f64> {
    match method {
        RecombinationMethod::Crossover => (0..father.len())
            .map(|i| if i < point { mother[i] } else { father[i] })
            .collect(),
        RecombinationMethod::Discrete => mother
            .iter()
            .enumerate()
            .map(|(i, &m)| match father.get(i) {
                Some(&f) if rng.gen_bool(0.5) => f,
                _ => m,
            })
            .collect(),
        RecombinationMethod::Fixed => mother.to_vec(),
        RecombinationMethod::Intermediate => mother
            .iter()
            .enumerate()
            .map(|(i, &m)| match father.get(i) {
                Some(&f) => uniform_between(rng, m, f),
                None => m,
            })
            .collect(),
    }
}

/// Step sizes for a child of `length` genes. Either parent's sigma slice may be
/// shorter than the child (or empty); positions only one parent covers come from
/// that parent, positions neither covers get `fallback`.
fn recombine_sigmas<R: Rng>(
    method: RecombinationMethod,
    mother: &[f64],
    father: &[f64],
    length: usize,
    point: usize,
    fallback: f64,
    rng: &mut R,
) -> Vec<f64> {
    (0..length)
        .map(|i| {
            let m = mother.get(i).copied();
            let f = father.get(i).copied();
            let sigma = match method {
                RecombinationMethod::Crossover => {
                    if i < point {
                        m.or(f)
                    } else {
                        f.or(m)
                    }
                }
                RecombinationMethod::Discrete => match (m, f) {
                    (Some(m), Some(f)) => Some(if rng.gen_bool(0.5) { m } else { f }),
                    (one, other) => one.or(other),
                },
                RecombinationMethod::Fixed => m.or(f),
                RecombinationMethod::Intermediate => match (m, f) {
                    (Some(m), Some(f)) => Some(uniform_between(rng, m, f)),
                    (one, other) => one.or(other),
                },
            };
            clamp01(sigma.unwrap_or(fallback))
        })
        .collect()
}

/// Self-adaptive log-normal mutation.
///
/// One global factor `exp(U(-τ, τ))` with `τ = 1/sqrt(2N)` is shared by every gene;
/// each gene also draws its own factor `exp(U(-τ', τ'))` with `τ' = 1/sqrt(2·sqrt(N))`.
/// The step size is scaled by both factors first, then the gene moves by a uniform
/// draw within the *new* step size. Everything is clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Mutator {
    /// Step size given to genomes that arrive without one
    pub initial_sigma: f64,
}

impl Mutator {
    pub fn new(initial_sigma: f64) -> Self {
        Self { initial_sigma }
    }

    pub fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) {
        let n = genome.len();
        if n == 0 {
            return;
        }
        let tau = 1.0 / (2.0 * n as f64).sqrt();
        let tau_prime = 1.0 / (2.0 * (n as f64).sqrt()).sqrt();
        let global_factor = rng.gen_range(-tau..=tau).exp();

        let (genes, sigmas) = genome.genes_and_sigmas_mut(self.initial_sigma);
        for (gene, sigma) in genes.iter_mut().zip(sigmas.iter_mut()) {
            let individual_factor = rng.gen_range(-tau_prime..=tau_prime).exp();
            *sigma = clamp01(*sigma * individual_factor * global_factor);
            let step = uniform_between(rng, -*sigma, *sigma);
            *gene = clamp01(*gene + step);
        }
    }
}

/// Fresh random genome, with uniform step sizes when `initial_sigma` is given
pub fn spontaneous_genome<R: Rng>(length: usize, initial_sigma: Option<f64>, rng: &mut R) -> Genome {
    let mut genome = match initial_sigma {
        Some(sigma) => Genome::self_adaptive(length, sigma),
        None => Genome::new(length),
    };
    genome.randomize(rng);
    genome
}
