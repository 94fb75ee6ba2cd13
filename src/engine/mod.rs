pub mod codec;
pub mod evaluator;
pub mod fitness;
pub mod genome;
pub mod individual;
pub mod operators;
pub mod population;
pub mod runner;

pub use codec::{decode_params, ClassifierId, DecodeContext, HyperField, ParamValue};
pub use evaluator::{CommandEvaluator, ModelEvaluator};
pub use fitness::{FitnessCache, FitnessEvaluator};
pub use genome::Chromosome;
pub use individual::Individual;
pub use population::Population;
pub use runner::{GaRunner, GenerationObserver, GenerationReport, RunState, SilentObserver};
