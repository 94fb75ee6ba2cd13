use anyhow::{Context, Result};
use clap::Parser;
use gaselect::engine::{ClassifierId, CommandEvaluator, FitnessEvaluator, GaRunner};
use gaselect::folds::FoldSet;
use gaselect::report::{self, ConsoleObserver};
use gaselect::AppConfig;
use std::path::PathBuf;

/// GA-based feature and classifier-hyperparameter selection.
#[derive(Parser)]
#[command(name = "gaselect", version, about)]
struct Cli {
    /// TOML run configuration.
    #[arg(short, long, default_value = "gaselect.toml")]
    config: PathBuf,

    /// Override the classifier id from the config file.
    #[arg(short = 'C', long)]
    classifier: Option<u32>,

    /// Override the population size from the config file.
    #[arg(short, long)]
    population: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(classifier) = cli.classifier {
        config.run.classifier = classifier;
    }
    if let Some(population) = cli.population {
        config.ga.population_size = population;
    }
    config.validate()?;

    let classifier = ClassifierId::from_id(config.run.classifier)?;
    let param_bits = if config.run.optimize_parameters {
        classifier.param_bits()
    } else {
        0
    };

    let folds = FoldSet::new(&config.run.work_folder, config.run.fold_count);
    let evaluator = FitnessEvaluator::new(
        &config.ga,
        classifier,
        config.run.feature_count,
        folds,
        Box::new(CommandEvaluator::new(&config.run.evaluator_command)),
    )
    .context("preparing fitness evaluation")?;

    let mut runner = GaRunner::new(
        config.ga.clone(),
        config.run.feature_count,
        param_bits,
        evaluator,
    )?;

    let winner = runner.run(&mut ConsoleObserver).context("running GA")?;

    report::write_solution(&config.run.output_path, &winner)
        .with_context(|| format!("writing {}", config.run.output_path.display()))?;
    report::print_final_report(&winner, &config.run.feature_names_path, &config.run.output_path)?;

    Ok(())
}
