use gaselect::config::GaConfig;
use gaselect::engine::{
    operators, ClassifierId, Chromosome, FitnessEvaluator, GaRunner, HyperField, Individual,
    ModelEvaluator, Population, SilentObserver,
};
use gaselect::folds::FoldSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Deterministic stand-in for the external classifier; counts invocations.
struct StubEvaluator {
    calls: Arc<AtomicUsize>,
    score: Box<dyn Fn(&[u8]) -> f64 + Send + Sync>,
}

impl StubEvaluator {
    fn new<F>(score: F) -> (Self, Arc<AtomicUsize>)
    where
        F: Fn(&[u8]) -> f64 + Send + Sync + 'static,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
                score: Box::new(score),
            },
            calls,
        )
    }
}

impl ModelEvaluator for StubEvaluator {
    fn evaluate(
        &self,
        _train: &Path,
        _test: &Path,
        feature_mask: &[u8],
        _classifier: ClassifierId,
        _params: &[HyperField],
    ) -> gaselect::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.score)(feature_mask))
    }
}

/// Fold files where every feature has known values, `feature_count` columns
/// plus a class label.
fn write_folds(dir: &Path, fold_count: usize, feature_count: usize) -> FoldSet {
    for fold in 0..fold_count {
        let mut f = File::create(dir.join(format!("train_instance_{}", fold + 1))).unwrap();
        for row in 0..4 {
            let mut cols: Vec<String> = (0..feature_count)
                .map(|c| (row * feature_count + c).to_string())
                .collect();
            cols.push(format!("os{}", row % 2));
            writeln!(f, "{}", cols.join(",")).unwrap();
        }
    }
    FoldSet::new(dir, fold_count)
}

fn test_config(performance_weight: f64, feature_weight: f64) -> GaConfig {
    GaConfig {
        population_size: 10,
        iteration: 3,
        tournament_size: 3,
        uniform_rate: 0.5,
        mutation_rate: 0.05,
        performance_weight,
        feature_weight,
        max_threads: 2,
        seed: Some(42),
    }
}

fn make_evaluator(
    dir: &Path,
    fold_count: usize,
    feature_count: usize,
    config: &GaConfig,
    stub: StubEvaluator,
) -> FitnessEvaluator {
    let folds = write_folds(dir, fold_count, feature_count);
    FitnessEvaluator::new(
        config,
        ClassifierId::MajorityRule,
        feature_count,
        folds,
        Box::new(stub),
    )
    .unwrap()
}

#[test]
fn cache_evaluates_each_genome_at_most_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(0.95, 0.05);
    let (stub, calls) = StubEvaluator::new(|_| 80.0);
    let evaluator = make_evaluator(dir.path(), 2, 3, &config, stub);

    let genome = Chromosome::new(vec![1, 0, 1], 3);
    let mut first = Individual::new(genome.clone());
    let mut second = Individual::new(genome);

    let f1 = first.evaluate(&evaluator).unwrap();
    let calls_after_first = calls.load(Ordering::SeqCst);
    let f2 = second.evaluate(&evaluator).unwrap();

    assert_eq!(f1, f2);
    // Two folds -> two ordered train/test pairs, all from the first pass.
    assert_eq!(calls_after_first, 2);
    assert_eq!(calls.load(Ordering::SeqCst), calls_after_first);
    assert_eq!(evaluator.cache().len(), 1);
}

#[test]
fn all_zero_mask_short_circuits_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(0.95, 0.05);
    let (stub, calls) = StubEvaluator::new(|_| 100.0);

    // Tree classifier: the 17 hyperparameter bits must not matter.
    let folds = write_folds(dir.path(), 2, 4);
    let evaluator =
        FitnessEvaluator::new(&config, ClassifierId::Tree, 4, folds, Box::new(stub)).unwrap();

    let mut genes = vec![0, 0, 0, 0];
    genes.extend(vec![1; ClassifierId::Tree.param_bits()]);
    let fitness = evaluator.fitness(&Chromosome::new(genes, 4)).unwrap();

    assert_eq!(fitness, 0.0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn composite_fitness_matches_weighted_sum() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(0.95, 0.05);
    let (stub, calls) = StubEvaluator::new(|mask: &[u8]| {
        if mask.iter().all(|&b| b == 1) {
            100.0
        } else {
            80.0
        }
    });
    let evaluator = make_evaluator(dir.path(), 2, 4, &config, stub);

    // Full mask: 0.95 * 100 + 0.05 * 0 = 95.
    let full = evaluator
        .fitness(&Chromosome::new(vec![1, 1, 1, 1], 4))
        .unwrap();
    assert!((full - 95.0).abs() < 1e-9);

    // Half mask: 0.95 * 80 + 0.05 * 50 = 78.5.
    let half = evaluator
        .fitness(&Chromosome::new(vec![1, 0, 1, 0], 4))
        .unwrap();
    assert!((half - 78.5).abs() < 1e-9);

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn null_features_are_pruned_from_the_working_mask() {
    let dir = tempfile::tempdir().unwrap();
    // Feature 0 is unknown in every instance of every fold.
    for fold in 0..2 {
        let mut f =
            File::create(dir.path().join(format!("train_instance_{}", fold + 1))).unwrap();
        writeln!(f, "?,1,os0").unwrap();
        writeln!(f, "?,2,os1").unwrap();
    }
    let folds = FoldSet::new(dir.path(), 2);

    let config = test_config(0.5, 0.5);
    let (stub, calls) = StubEvaluator::new(|_| 60.0);
    let evaluator =
        FitnessEvaluator::new(&config, ClassifierId::MajorityRule, 2, folds, Box::new(stub))
            .unwrap();

    // Only the null feature selected: degenerate after pruning.
    let degenerate = Chromosome::new(vec![1, 0], 2);
    assert_eq!(evaluator.fitness(&degenerate).unwrap(), 0.0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Both selected: pruning leaves one, parsimony counts post-pruning.
    let both = Chromosome::new(vec![1, 1], 2);
    let fitness = evaluator.fitness(&both).unwrap();
    assert!((fitness - (0.5 * 60.0 + 0.5 * 50.0)).abs() < 1e-9);
    // The stored chromosome is untouched.
    assert_eq!(both.feature_mask(), &[1, 1]);
}

#[test]
fn fittest_is_identical_for_pool_sizes_one_and_n() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let config = test_config(1.0, 0.0);
    let score = |mask: &[u8]| 10.0 * mask.iter().filter(|&&b| b == 1).count() as f64;

    let mut winners = Vec::new();
    for threads in [1usize, 8] {
        let dir = tempfile::tempdir().unwrap();
        let (stub, _) = StubEvaluator::new(score);
        let evaluator = make_evaluator(dir.path(), 2, 6, &config, stub);

        let mut rng = StdRng::seed_from_u64(7);
        let mut population = Population::random(8, 6, 0, &mut rng);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let fittest = population.fittest(&evaluator, &pool, 1).unwrap();
        winners.push(fittest.chromosome().clone());
    }

    assert_eq!(winners[0], winners[1]);
}

#[test]
fn fittest_breaks_ties_to_the_first_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(1.0, 0.0);
    let (stub, _) = StubEvaluator::new(|_| 50.0);
    let evaluator = make_evaluator(dir.path(), 2, 2, &config, stub);

    let individuals = vec![
        Individual::new(Chromosome::new(vec![1, 0], 2)),
        Individual::new(Chromosome::new(vec![0, 1], 2)),
        Individual::new(Chromosome::new(vec![1, 1], 2)),
    ];
    let mut population = Population::from_individuals(individuals);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
    let fittest = population.fittest(&evaluator, &pool, 1).unwrap();
    // All non-degenerate genomes score the same; the first one wins.
    assert_eq!(fittest.chromosome(), &Chromosome::new(vec![1, 0], 2));
}

#[test]
fn evolution_preserves_population_size() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let config = test_config(1.0, 0.0);

    for size in [1usize, 2, 9] {
        let dir = tempfile::tempdir().unwrap();
        let (stub, _) = StubEvaluator::new(|_| 70.0);
        let evaluator = make_evaluator(dir.path(), 2, 4, &config, stub);

        let mut rng = StdRng::seed_from_u64(11);
        let mut population = Population::random(size, 4, 0, &mut rng);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        population.fittest(&evaluator, &pool, 1).unwrap();

        let next = operators::evolve_population(&population, &config, &mut rng);
        assert_eq!(next.size(), size);
        assert!(next.individuals().iter().all(|i| !i.is_evaluated()));
    }
}

#[test]
fn runner_converges_and_reports_the_winner() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(1.0, 0.0);
    // No mutation: selection drift homogenizes the population, after which
    // the winning genome repeats and the stagnation detector fires.
    config.mutation_rate = 0.0;

    let (stub, _) = StubEvaluator::new(|mask: &[u8]| {
        25.0 * mask.iter().filter(|&&b| b == 1).count() as f64
    });
    let evaluator = make_evaluator(dir.path(), 2, 4, &config, stub);

    let mut runner = GaRunner::new(config, 4, 0, evaluator).unwrap();
    let winner = runner.run(&mut SilentObserver).unwrap();

    assert_eq!(winner.len(), 4);
    assert!(winner.selected_count() >= 1);
    assert!(runner.cache_len() >= 1);
}

#[test]
fn evaluator_failure_aborts_with_generation_context() {
    struct FailingEvaluator;
    impl ModelEvaluator for FailingEvaluator {
        fn evaluate(
            &self,
            _train: &Path,
            _test: &Path,
            _mask: &[u8],
            _classifier: ClassifierId,
            _params: &[HyperField],
        ) -> gaselect::Result<f64> {
            Err(gaselect::GaError::Evaluator("corrupt fold file".to_string()))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(0.95, 0.05);
    let folds = write_folds(dir.path(), 2, 3);
    let evaluator = FitnessEvaluator::new(
        &config,
        ClassifierId::MajorityRule,
        3,
        folds,
        Box::new(FailingEvaluator),
    )
    .unwrap();

    let mut runner = GaRunner::new(config, 3, 0, evaluator).unwrap();
    let err = runner.run(&mut SilentObserver).unwrap_err();

    match err {
        gaselect::GaError::Evaluation {
            generation, genome, ..
        } => {
            assert_eq!(generation, 1);
            assert_eq!(genome.len(), 3);
        }
        other => panic!("expected Evaluation error, got {:?}", other),
    }
}
