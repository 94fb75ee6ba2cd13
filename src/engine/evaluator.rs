use crate::engine::codec::{ClassifierId, HyperField};
use crate::error::{GaError, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

/// External classifier training/evaluation routine.
///
/// Implementations train a model on the train fold with the masked feature
/// set, evaluate it on the test fold, and return a performance score in
/// `[0, 100]`. Deterministic for fixed inputs and fixed fold data; may be
/// slow, may fail on unreadable or corrupt fold files.
pub trait ModelEvaluator: Send + Sync {
    fn evaluate(
        &self,
        train: &Path,
        test: &Path,
        feature_mask: &[u8],
        classifier: ClassifierId,
        params: &[HyperField],
    ) -> Result<f64>;
}

/// Shells out to an external classifier program, one invocation per
/// train/test fold pair.
///
/// Arguments passed: train path, test path, comma-joined 1-based indices of
/// the removed features, numeric classifier id, JSON hyperparameter record.
/// The program prints the performance score as a single float on stdout.
pub struct CommandEvaluator {
    command: String,
}

impl CommandEvaluator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 1-based indices of mask zeroes, comma-joined; the form the external
    /// attribute-removal filter expects.
    fn removed_indices(mask: &[u8]) -> String {
        mask.iter()
            .enumerate()
            .filter(|(_, &bit)| bit == 0)
            .map(|(i, _)| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl ModelEvaluator for CommandEvaluator {
    fn evaluate(
        &self,
        train: &Path,
        test: &Path,
        feature_mask: &[u8],
        classifier: ClassifierId,
        params: &[HyperField],
    ) -> Result<f64> {
        let params_json = serde_json::to_string(params)?;
        let removed = Self::removed_indices(feature_mask);

        debug!(
            "evaluator: train={} test={} classifier={:?}",
            train.display(),
            test.display(),
            classifier
        );

        let output = Command::new(&self.command)
            .arg(train)
            .arg(test)
            .arg(&removed)
            .arg(classifier.id().to_string())
            .arg(&params_json)
            .output()
            .map_err(|e| GaError::Evaluator(format!("Failed to spawn {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(GaError::Evaluator(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let score: f64 = stdout.trim().parse().map_err(|_| {
            GaError::Evaluator(format!(
                "{} printed a non-numeric score: {:?}",
                self.command,
                stdout.trim()
            ))
        })?;

        if !(0.0..=100.0).contains(&score) {
            return Err(GaError::Evaluator(format!(
                "Score {} outside [0, 100]",
                score
            )));
        }
        Ok(score)
    }
}
