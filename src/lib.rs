//! Genetic feature and hyperparameter selection for classification tasks.
//!
//! Candidate solutions are fixed-length bit strings: a feature-inclusion mask
//! followed by a classifier-specific hyperparameter segment. The engine
//! evolves a population of candidates with tournament selection, uniform
//! crossover and bitwise mutation, evaluating fitness in parallel through an
//! external classifier and stopping once the winning genome stagnates.

pub mod config;
pub mod engine;
pub mod error;
pub mod folds;
pub mod report;

pub use config::{AppConfig, GaConfig, RunConfig};
pub use error::{GaError, Result};
