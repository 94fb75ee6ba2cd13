use crate::engine::fitness::FitnessEvaluator;
use crate::engine::individual::Individual;
use crate::error::{GaError, Result};
use rand::Rng;
use rayon::prelude::*;

/// Ordered, fixed-size collection of individuals. Replaced wholesale each
/// generation by the evolution operator.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Initial population with uniformly random genes.
    pub fn random<R: Rng>(size: usize, features: usize, param_bits: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::random(features, param_bits, rng))
            .collect();
        Self { individuals }
    }

    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Evaluate every individual on the worker pool, then return the one with
    /// the maximum fitness. Ties break to the first occurrence in population
    /// order, so the result is independent of pool size. The comparison only
    /// starts once every dispatched evaluation has finished.
    pub fn fittest(
        &mut self,
        evaluator: &FitnessEvaluator,
        pool: &rayon::ThreadPool,
        generation: usize,
    ) -> Result<&Individual> {
        pool.install(|| {
            self.individuals.par_iter_mut().try_for_each(|individual| {
                individual
                    .evaluate(evaluator)
                    .map(|_| ())
                    .map_err(|e| GaError::Evaluation {
                        generation,
                        genome: individual.chromosome().to_string(),
                        message: e.to_string(),
                    })
            })
        })?;

        // Fitness is Some for every individual after the join above.
        let mut fittest = 0;
        for i in 1..self.individuals.len() {
            if self.individuals[i].fitness() > self.individuals[fittest].fitness() {
                fittest = i;
            }
        }
        Ok(&self.individuals[fittest])
    }
}
