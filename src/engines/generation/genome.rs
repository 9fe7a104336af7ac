use super::gene_consumer::GenomeReader;
use super::section::Section;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Real-valued genome for the evolvable population
///
/// A genome is a fixed-length sequence of genes in `[0, 1]`. Self-adaptive genomes
/// additionally carry one mutation step size ("sigma", also in `[0, 1]`) per gene,
/// which the mutation operator evolves alongside the genes themselves.
///
/// The length is fixed at construction. Recombination produces new genomes and
/// mutation edits values in place, but nothing ever grows or shrinks a genome.
///
/// Phenotypes read genes through a [`Section`], so a consumer can address e.g.
/// "the last gene, then wrap to the first three" without caring about the length:
///
/// ```
/// use evolvable::engines::generation::{Genome, Section, Segment};
///
/// let genome = Genome::from_genes(vec![0.0, 0.1, 0.2, 0.3]);
/// let section = Section::new(vec![Segment::new(i64::MAX, 1)]);
/// assert_eq!(genome.read(&section), vec![0.3, 0.0, 0.1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    genes: Vec<f64>,
    sigmas: Option<Vec<f64>>,
}

impl Genome {
    /// Zeroed genome without step sizes
    pub fn new(length: usize) -> Self {
        Self {
            genes: vec![0.0; length],
            sigmas: None,
        }
    }

    /// Zeroed genome with every step size set to `initial_sigma`
    pub fn self_adaptive(length: usize, initial_sigma: f64) -> Self {
        Self {
            genes: vec![0.0; length],
            sigmas: Some(vec![clamp01(initial_sigma); length]),
        }
    }

    pub fn from_genes(genes: Vec<f64>) -> Self {
        Self {
            genes: genes.into_iter().map(clamp01).collect(),
            sigmas: None,
        }
    }

    /// Builds a genome from explicit genes and step sizes.
    ///
    /// Returns `None` when the two sequences differ in length.
    pub fn from_parts(genes: Vec<f64>, sigmas: Vec<f64>) -> Option<Self> {
        if genes.len() != sigmas.len() {
            return None;
        }
        Some(Self {
            genes: genes.into_iter().map(clamp01).collect(),
            sigmas: Some(sigmas.into_iter().map(clamp01).collect()),
        })
    }

    /// Step sizes are fitted to the gene count, padding with `fill`
    pub(crate) fn with_sigmas(genes: Vec<f64>, mut sigmas: Vec<f64>, fill: f64) -> Self {
        sigmas.resize(genes.len(), fill);
        Self {
            genes: genes.into_iter().map(clamp01).collect(),
            sigmas: Some(sigmas.into_iter().map(clamp01).collect()),
        }
    }

    /// Fill every gene with a uniform draw from `[0, 1]`
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for gene in self.genes.iter_mut() {
            *gene = rng.gen_range(0.0..=1.0);
        }
    }

    /// Reproducible randomisation: the same seed always yields the same genes
    pub fn randomize_seeded(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.randomize(&mut rng);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<f64> {
        self.genes.get(position).copied()
    }

    /// Overwrite one gene, clamped into `[0, 1]`. Out-of-range positions are ignored.
    pub fn set(&mut self, position: usize, value: f64) {
        if let Some(gene) = self.genes.get_mut(position) {
            *gene = clamp01(value);
        }
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn sigmas(&self) -> Option<&[f64]> {
        self.sigmas.as_deref()
    }

    pub fn is_self_adaptive(&self) -> bool {
        self.sigmas.is_some()
    }

    /// Mutable view of genes and step sizes together, creating step sizes at
    /// `initial_sigma` if this genome has none yet.
    pub(crate) fn genes_and_sigmas_mut(&mut self, initial_sigma: f64) -> (&mut [f64], &mut [f64]) {
        let length = self.genes.len();
        let sigmas = self
            .sigmas
            .get_or_insert_with(|| vec![clamp01(initial_sigma); length]);
        (&mut self.genes, sigmas)
    }

    /// Section covering the whole genome in forward order
    pub fn to_section(&self) -> Section {
        Section::default()
    }

    /// Current values at the indices `section` resolves to
    pub fn read(&self, section: &Section) -> Vec<f64> {
        section
            .resolve_indices(self.len())
            .into_iter()
            .map(|i| self.genes[i])
            .collect()
    }

    /// Every gene in forward order
    pub fn read_all(&self) -> Vec<f64> {
        self.genes.clone()
    }

    pub fn reader(&self, section: &Section) -> GenomeReader<'_> {
        GenomeReader::new(self, section)
    }
}

impl std::ops::Index<usize> for Genome {
    type Output = f64;

    fn index(&self, position: usize) -> &f64 {
        &self.genes[position]
    }
}

pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
