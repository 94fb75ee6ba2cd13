use crate::config::GaConfig;
use crate::engine::fitness::FitnessEvaluator;
use crate::engine::genome::Chromosome;
use crate::engine::operators::evolve_population;
use crate::engine::population::Population;
use crate::error::{GaError, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Converged,
}

/// Best-of-generation snapshot handed to observers.
pub struct GenerationReport<'a> {
    pub generation: usize,
    pub chromosome: &'a Chromosome,
    pub selected: usize,
    pub total_features: usize,
    pub fitness: f64,
}

/// Per-generation hook; the library reports through this instead of printing.
pub trait GenerationObserver: Send {
    fn on_generation(&mut self, report: &GenerationReport);
}

/// Observer that does nothing; for callers that only want the final answer.
pub struct SilentObserver;

impl GenerationObserver for SilentObserver {
    fn on_generation(&mut self, _report: &GenerationReport) {}
}

/// True once the most recent winner has repeated for the whole window.
/// Strict genome equality, not a fitness plateau.
pub fn has_converged(history: &[String], window: usize) -> bool {
    if history.len() < window {
        return false;
    }
    let last = &history[history.len() - 1];
    history[history.len() - window..].iter().all(|s| s == last)
}

/// Drives the generational loop until the winning genome stagnates.
pub struct GaRunner {
    config: GaConfig,
    feature_count: usize,
    param_bits: usize,
    evaluator: FitnessEvaluator,
    pool: rayon::ThreadPool,
    rng: StdRng,
}

impl GaRunner {
    pub fn new(
        config: GaConfig,
        feature_count: usize,
        param_bits: usize,
        evaluator: FitnessEvaluator,
    ) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_threads)
            .build()
            .map_err(|e| GaError::Configuration(format!("Failed to build worker pool: {}", e)))?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            feature_count,
            param_bits,
            evaluator,
            pool,
            rng,
        })
    }

    pub fn cache_len(&self) -> usize {
        self.evaluator.cache().len()
    }

    /// Run to convergence and return the winning chromosome.
    pub fn run<O: GenerationObserver>(&mut self, observer: &mut O) -> Result<Chromosome> {
        let mut population = Population::random(
            self.config.population_size,
            self.feature_count,
            self.param_bits,
            &mut self.rng,
        );
        let mut history: Vec<String> = Vec::new();
        let mut state = RunState::Running;
        let mut best: Option<Chromosome> = None;
        let mut generation = 0;

        while state == RunState::Running {
            generation += 1;

            let fittest = population.fittest(&self.evaluator, &self.pool, generation)?;
            let chromosome = fittest.chromosome().clone();
            let fitness = fittest.fitness().unwrap_or(0.0);
            let selected = chromosome.selected_count();

            history.push(chromosome.to_string());
            observer.on_generation(&GenerationReport {
                generation,
                chromosome: &chromosome,
                selected,
                total_features: self.feature_count,
                fitness,
            });
            info!(
                "generation {}: best {} ({}/{} features, fitness {:.4})",
                generation, chromosome, selected, self.feature_count, fitness
            );

            if has_converged(&history, self.config.iteration) {
                debug!(
                    "winner repeated for {} generations, stopping",
                    self.config.iteration
                );
                state = RunState::Converged;
                best = Some(chromosome);
            } else {
                population = evolve_population(&population, &self.config, &mut self.rng);
            }
        }

        // `best` is Some whenever the loop exits in Converged state.
        best.ok_or_else(|| GaError::Configuration("Run ended without a result".to_string()))
    }
}
