use rand::Rng;
use std::fmt;

/// Bit-string encoding of one candidate solution.
///
/// The first `features` genes form the feature-inclusion mask (1 = keep);
/// the remaining genes are the classifier's hyperparameter segment, decoded
/// by the codec. Two chromosomes are equal iff their bit sequences are equal,
/// which is also the identity used by the fitness cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    genes: Vec<u8>,
    features: usize,
}

impl Chromosome {
    pub fn new(genes: Vec<u8>, features: usize) -> Self {
        debug_assert!(features <= genes.len());
        debug_assert!(genes.iter().all(|&g| g <= 1));
        Self { genes, features }
    }

    /// Draw every gene independently and uniformly from {0, 1}.
    pub fn random<R: Rng>(features: usize, param_bits: usize, rng: &mut R) -> Self {
        let genes = (0..features + param_bits)
            .map(|_| rng.gen_range(0..=1u8))
            .collect();
        Self { genes, features }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.features
    }

    pub fn gene(&self, index: usize) -> u8 {
        self.genes[index]
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    /// Feature-inclusion mask segment.
    pub fn feature_mask(&self) -> &[u8] {
        &self.genes[..self.features]
    }

    /// Hyperparameter segment (may be empty).
    pub fn param_segment(&self) -> &[u8] {
        &self.genes[self.features..]
    }

    pub fn selected_count(&self) -> usize {
        self.feature_mask().iter().filter(|&&g| g == 1).count()
    }

    /// Parse a chromosome back from its bit-string form.
    pub fn from_bit_string(bits: &str, features: usize) -> Option<Self> {
        let genes: Option<Vec<u8>> = bits
            .chars()
            .map(|c| match c {
                '0' => Some(0),
                '1' => Some(1),
                _ => None,
            })
            .collect();
        let genes = genes?;
        (features <= genes.len()).then(|| Self { genes, features })
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &g in &self.genes {
            write!(f, "{}", g)?;
        }
        Ok(())
    }
}
