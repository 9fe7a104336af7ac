use serde::{Deserialize, Serialize};

/// Inclusive range over a genome treated as a circular index space.
///
/// `start` and `stop` are arbitrary integers. Each is clamped independently into
/// `[0, len - 1]`; if the clamped start lies after the clamped stop the range wraps
/// past the end of the genome back to index 0. A segment therefore always yields at
/// least one index: `start == stop` reads exactly one gene.
///
/// For a genome of length 30, `(-100, 100)` reads all 30 genes while `(100, -100)`
/// reads two: gene 29, then wraps to gene 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: i64,
    pub stop: i64,
}

impl Segment {
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    /// Clamped `(begin, end)` for a genome of `length` genes
    fn bounds(&self, length: usize) -> (usize, usize) {
        (clamp_position(self.start, length), clamp_position(self.stop, length))
    }

    pub fn resolved_len(&self, length: usize) -> usize {
        if length == 0 {
            return 0;
        }
        let (begin, end) = self.bounds(length);
        if begin <= end {
            end - begin + 1
        } else {
            (length - begin) + (end + 1)
        }
    }

    pub fn resolve_indices(&self, length: usize) -> Vec<usize> {
        if length == 0 {
            return Vec::new();
        }
        let (begin, end) = self.bounds(length);
        if begin <= end {
            (begin..=end).collect()
        } else {
            (begin..length).chain(0..=end).collect()
        }
    }
}

impl Default for Segment {
    /// Widest possible segment: the whole genome, forward
    fn default() -> Self {
        Self {
            start: i64::MIN,
            stop: i64::MAX,
        }
    }
}

fn clamp_position(position: i64, length: usize) -> usize {
    if position < 0 {
        0
    } else {
        (position as u64).min(length as u64 - 1) as usize
    }
}

/// Ordered concatenation of segments.
///
/// Indices are neither de-duplicated nor reordered, so a section may visit the
/// same gene several times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub segments: Vec<Segment>,
}

impl Section {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn resolved_len(&self, length: usize) -> usize {
        self.segments.iter().map(|s| s.resolved_len(length)).sum()
    }

    pub fn resolve_indices(&self, length: usize) -> Vec<usize> {
        let expected = self.resolved_len(length);
        let mut indices = Vec::with_capacity(expected);
        for segment in &self.segments {
            indices.extend(segment.resolve_indices(length));
        }
        if indices.len() != expected {
            log::warn!(
                "Section resolved {} indices but expected {} for genome length {}",
                indices.len(),
                expected,
                length
            );
        }
        indices
    }
}

impl Default for Section {
    fn default() -> Self {
        Self {
            segments: vec![Segment::default()],
        }
    }
}

impl From<Segment> for Section {
    fn from(segment: Segment) -> Self {
        Self::new(vec![segment])
    }
}
