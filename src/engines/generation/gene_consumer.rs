use super::genome::Genome;
use super::section::Section;

/// Restartable read position over a frozen index sequence.
///
/// The indices are resolved from a [`Section`] once, at construction or on an
/// explicit [`rebuild`](GenomeCursor::rebuild), and never change afterwards. Values
/// are not cached: each [`read_next`](GenomeCursor::read_next) looks up the gene the
/// genome holds *now*, so editing the genome between reads changes what is returned
/// but never the number or order of reads.
///
/// The cursor does not borrow the genome, which lets the owner keep mutating it
/// between reads.
#[derive(Debug, Clone)]
pub struct GenomeCursor {
    indices: Vec<usize>,
    position: usize,
}

impl GenomeCursor {
    pub fn new(genome: &Genome, section: &Section) -> Self {
        Self {
            indices: section.resolve_indices(genome.len()),
            position: 0,
        }
    }

    /// Re-resolve the index sequence and rewind
    pub fn rebuild(&mut self, genome: &Genome, section: &Section) {
        self.indices = section.resolve_indices(genome.len());
        self.reset();
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn has_next(&self) -> bool {
        self.position < self.indices.len()
    }

    /// Current value at the next frozen index, or `None` once exhausted.
    ///
    /// Also `None` if `genome` is shorter than the one the cursor was built for;
    /// the position is not advanced in that case.
    pub fn read_next(&mut self, genome: &Genome) -> Option<f64> {
        let index = *self.indices.get(self.position)?;
        let gene = genome.get(index)?;
        self.position += 1;
        Some(gene)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Cursor bound to a borrowed genome, for one-pass phenotype decoding
pub struct GenomeReader<'a> {
    genome: &'a Genome,
    cursor: GenomeCursor,
}

impl<'a> GenomeReader<'a> {
    pub fn new(genome: &'a Genome, section: &Section) -> Self {
        Self {
            genome,
            cursor: GenomeCursor::new(genome, section),
        }
    }

    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    /// Next gene mapped linearly into `[min, max]`; `min` once exhausted
    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        match self.next() {
            Some(gene) if min < max => min + gene * (max - min),
            _ => min,
        }
    }
}

impl Iterator for GenomeReader<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.cursor.read_next(self.genome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.len() - self.cursor.position();
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::section::Segment;

    fn ramp(length: usize) -> Genome {
        Genome::from_genes((0..length).map(|i| i as f64 / 10.0).collect())
    }

    #[test]
    fn test_cursor_reads_frozen_indices() {
        let genome = ramp(10);
        let mut cursor = GenomeCursor::new(&genome, &Segment::new(i64::MAX, 1).into());
        assert_eq!(cursor.indices(), &[9, 0, 1]);

        assert!(cursor.has_next());
        assert_eq!(cursor.read_next(&genome), Some(0.9));
        assert_eq!(cursor.read_next(&genome), Some(0.0));
        assert_eq!(cursor.read_next(&genome), Some(0.1));
        assert!(!cursor.has_next());
        assert_eq!(cursor.read_next(&genome), None);

        cursor.reset();
        assert_eq!(cursor.read_next(&genome), Some(0.9));
    }

    #[test]
    fn test_cursor_sees_live_values_but_keeps_shape() {
        let mut genome = ramp(10);
        let mut cursor = GenomeCursor::new(&genome, &Segment::new(i64::MAX, 5).into());
        assert_eq!(cursor.read_next(&genome), Some(0.9));
        assert_eq!(cursor.read_next(&genome), Some(0.0));

        genome.randomize_seeded(7);
        let mut rest = Vec::new();
        while cursor.has_next() {
            rest.push(cursor.read_next(&genome).unwrap());
        }
        assert_eq!(rest, vec![genome[1], genome[2], genome[3], genome[4], genome[5]]);
        assert_eq!(cursor.len(), 7);
    }

    #[test]
    fn test_rebuild_rewinds() {
        let genome = ramp(10);
        let mut cursor = GenomeCursor::new(&genome, &Section::default());
        cursor.read_next(&genome);
        cursor.rebuild(&genome, &Segment::new(3, 4).into());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.indices(), &[3, 4]);
    }

    #[test]
    fn test_reader_iterates_section() {
        let genome = ramp(5);
        let section = Section::new(vec![Segment::new(0, 1), Segment::new(4, 4)]);
        let values: Vec<f64> = genome.reader(&section).collect();
        assert_eq!(values, vec![0.0, 0.1, 0.4]);
    }

    #[test]
    fn test_reader_float_range() {
        let genome = Genome::from_genes(vec![0.5, 1.0]);
        let mut reader = genome.reader(&Section::default());
        assert_eq!(reader.float_range(-2.0, 2.0), 0.0);
        assert_eq!(reader.float_range(0.0, 10.0), 10.0);
        assert_eq!(reader.float_range(0.0, 10.0), 0.0);
    }
}
