use crate::config::GaConfig;
use crate::engine::codec::{decode_params, ClassifierId, DecodeContext};
use crate::engine::evaluator::ModelEvaluator;
use crate::engine::genome::Chromosome;
use crate::error::Result;
use crate::folds::FoldSet;
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::Mutex;

/// Run-wide memoization of fitness by exact gene-vector equality.
///
/// Shared by all evaluation workers. Lookup and insert are each atomic under
/// one lock; two workers may still race to compute the same uncached genome,
/// in which case the first insert wins and the loser's value is discarded
/// (both agree anyway since evaluation is deterministic).
#[derive(Debug, Default)]
pub struct FitnessCache {
    entries: Mutex<HashMap<Chromosome, f64>>,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, genome: &Chromosome) -> Option<f64> {
        self.entries.lock().unwrap().get(genome).copied()
    }

    /// First writer wins; returns the value that ended up in the cache.
    pub fn insert_if_absent(&self, genome: Chromosome, fitness: f64) -> f64 {
        *self
            .entries
            .lock()
            .unwrap()
            .entry(genome)
            .or_insert(fitness)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns a chromosome into its composite fitness:
/// `w_perf * cross_validation_mean + w_features * 100 * (1 - selected/total)`.
pub struct FitnessEvaluator {
    classifier: ClassifierId,
    folds: FoldSet,
    decode_ctx: DecodeContext,
    performance_weight: f64,
    feature_weight: f64,
    feature_count: usize,
    /// Features with no known value anywhere in the fold data; computed once
    /// per run, force-deselected in every evaluation.
    all_null: Vec<bool>,
    cache: FitnessCache,
    evaluator: Box<dyn ModelEvaluator>,
}

impl FitnessEvaluator {
    pub fn new(
        config: &GaConfig,
        classifier: ClassifierId,
        feature_count: usize,
        folds: FoldSet,
        evaluator: Box<dyn ModelEvaluator>,
    ) -> Result<Self> {
        let all_null = folds.all_null_features(feature_count)?;
        let decode_ctx = DecodeContext {
            feature_count,
            fold_instance_min: folds.min_instance_count()?,
        };

        Ok(Self {
            classifier,
            folds,
            decode_ctx,
            performance_weight: config.performance_weight,
            feature_weight: config.feature_weight,
            feature_count,
            all_null,
            cache: FitnessCache::new(),
            evaluator,
        })
    }

    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }

    /// Composite fitness of `genome`, memoized on the original (pre-pruning)
    /// gene vector. The stored chromosome is never mutated; pruning happens
    /// on a working copy of the mask.
    pub fn fitness(&self, genome: &Chromosome) -> Result<f64> {
        if let Some(cached) = self.cache.lookup(genome) {
            trace!("cache hit for {}", genome);
            return Ok(cached);
        }

        let mut mask = genome.feature_mask().to_vec();
        for (bit, &null) in mask.iter_mut().zip(&self.all_null) {
            if null {
                *bit = 0;
            }
        }

        let selected = mask.iter().filter(|&&b| b == 1).count();
        if selected == 0 {
            // Degenerate genome: nothing left to classify on. Defined as
            // fitness 0, the evaluator is never consulted.
            debug!("degenerate genome {}, fitness 0", genome);
            return Ok(0.0);
        }

        // Runs without hyperparameter optimization carry no parameter bits;
        // the classifier then uses its defaults.
        let params = if genome.param_segment().is_empty() {
            Vec::new()
        } else {
            decode_params(self.classifier, genome.param_segment(), &self.decode_ctx)?
        };

        // Leave-one-fold-out: average over train folds for each fixed test
        // fold, then average the per-test-fold means.
        let fold_count = self.folds.fold_count();
        let mut overall_sum = 0.0;
        for test_fold in 0..fold_count {
            let mut pair_sum = 0.0;
            for train_fold in 0..fold_count {
                if train_fold == test_fold {
                    continue;
                }
                pair_sum += self.evaluator.evaluate(
                    &self.folds.arff_path(train_fold),
                    &self.folds.arff_path(test_fold),
                    &mask,
                    self.classifier,
                    &params,
                )?;
            }
            overall_sum += pair_sum / (fold_count - 1) as f64;
        }
        let performance_mean = overall_sum / fold_count as f64;

        let parsimony = 100.0 * (1.0 - selected as f64 / self.feature_count as f64);
        let fitness = self.performance_weight * performance_mean + self.feature_weight * parsimony;

        Ok(self.cache.insert_if_absent(genome.clone(), fitness))
    }
}
