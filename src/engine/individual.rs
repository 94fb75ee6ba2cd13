use crate::engine::fitness::FitnessEvaluator;
use crate::engine::genome::Chromosome;
use crate::error::Result;
use rand::Rng;

/// One population member: a chromosome plus its lazily computed fitness.
/// Fitness is computed at most once per instance; cross-individual reuse is
/// the fitness cache's job.
#[derive(Debug, Clone)]
pub struct Individual {
    chromosome: Chromosome,
    fitness: Option<f64>,
}

impl Individual {
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    pub fn random<R: Rng>(features: usize, param_bits: usize, rng: &mut R) -> Self {
        Self::new(Chromosome::random(features, param_bits, rng))
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Compute and pin this individual's fitness. Subsequent calls are no-ops.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator) -> Result<f64> {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }
        let fitness = evaluator.fitness(&self.chromosome)?;
        self.fitness = Some(fitness);
        Ok(fitness)
    }
}
