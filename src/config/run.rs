use crate::error::GaError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything outside the GA tuning knobs: where the fold files live, which
/// classifier is optimized, and where the winning chromosome is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Folder containing `train_instance_<n>` / `train_instance_<n>.arff`.
    pub work_folder: PathBuf,
    /// Number of cross-validation folds.
    pub fold_count: usize,
    /// Number of candidate features (feature genes in the chromosome).
    pub feature_count: usize,
    /// Classifier id, 0-12. See `engine::codec::ClassifierId`.
    pub classifier: u32,
    /// When false the chromosome carries no hyperparameter bits.
    pub optimize_parameters: bool,
    /// Ordered feature-name list, one feature per line, name in the first
    /// comma-separated field.
    pub feature_names_path: PathBuf,
    /// Destination for the winning chromosome's bit string.
    pub output_path: PathBuf,
    /// External evaluator command; receives fold paths, removed indices,
    /// classifier id and a JSON hyperparameter record.
    pub evaluator_command: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            work_folder: PathBuf::from("."),
            fold_count: 3,
            feature_count: 0,
            classifier: 0,
            optimize_parameters: true,
            feature_names_path: PathBuf::from("features.txt"),
            output_path: PathBuf::from("selected_features_by_ga"),
            evaluator_command: String::from("classify-ml"),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), GaError> {
        if self.feature_count == 0 {
            return Err(GaError::Configuration(
                "Feature count must be positive".to_string(),
            ));
        }
        if self.fold_count < 2 {
            return Err(GaError::Configuration(
                "At least two folds are required for cross-validation".to_string(),
            ));
        }
        if self.evaluator_command.trim().is_empty() {
            return Err(GaError::Configuration(
                "Evaluator command must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
