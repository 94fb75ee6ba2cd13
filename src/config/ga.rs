use crate::error::GaError;
use serde::{Deserialize, Serialize};

/// Tuning parameters of the genetic search. Immutable for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    pub population_size: usize,
    /// Convergence window: the run stops once the same winning genome has
    /// repeated for this many consecutive generations.
    pub iteration: usize,
    pub tournament_size: usize,
    /// Probability that a child gene comes from the first parent.
    pub uniform_rate: f64,
    /// Per-gene flip probability applied after crossover.
    pub mutation_rate: f64,
    /// Weight of the classification score in the composite fitness.
    pub performance_weight: f64,
    /// Weight of the feature-parsimony term in the composite fitness.
    pub feature_weight: f64,
    /// Size of the worker pool used for fitness evaluation.
    pub max_threads: usize,
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            iteration: 10,
            tournament_size: 5,
            uniform_rate: 0.5,
            mutation_rate: 0.05,
            performance_weight: 0.95,
            feature_weight: 0.05,
            max_threads: std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1).max(1))
                .unwrap_or(1),
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<(), GaError> {
        if self.population_size == 0 {
            return Err(GaError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.iteration == 0 {
            return Err(GaError::Configuration(
                "Convergence window must be positive".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(GaError::Configuration(
                "Tournament size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.uniform_rate) {
            return Err(GaError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if (self.performance_weight + self.feature_weight - 1.0).abs() > 1e-9 {
            return Err(GaError::Configuration(
                "Fitness weights must sum to 1".to_string(),
            ));
        }
        if self.max_threads == 0 {
            return Err(GaError::Configuration(
                "Worker count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
