use crate::error::{GaError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Marker used in the instance files for a missing feature value.
const UNKNOWN: &str = "?";

/// The per-fold instance files the evaluator and the null scan consume.
///
/// Fold `n` (1-based on disk) has a plain comma-separated instance file
/// `train_instance_<n>` and an ARFF sibling `train_instance_<n>.arff`; both
/// are produced upstream by the feature-extraction pipeline.
#[derive(Debug, Clone)]
pub struct FoldSet {
    work_folder: PathBuf,
    fold_count: usize,
}

impl FoldSet {
    pub fn new<P: AsRef<Path>>(work_folder: P, fold_count: usize) -> Self {
        Self {
            work_folder: work_folder.as_ref().to_path_buf(),
            fold_count,
        }
    }

    pub fn fold_count(&self) -> usize {
        self.fold_count
    }

    pub fn instance_path(&self, fold: usize) -> PathBuf {
        self.work_folder.join(format!("train_instance_{}", fold + 1))
    }

    pub fn arff_path(&self, fold: usize) -> PathBuf {
        self.work_folder
            .join(format!("train_instance_{}.arff", fold + 1))
    }

    /// Smallest instance count over all folds; bounds the fold-dependent
    /// hyperparameter ranges.
    pub fn min_instance_count(&self) -> Result<usize> {
        let mut min = usize::MAX;
        for fold in 0..self.fold_count {
            let count = self.instance_lines(fold)?.len();
            min = min.min(count);
        }
        if min == 0 || min == usize::MAX {
            return Err(GaError::FoldData(
                "Fold instance files contain no instances".to_string(),
            ));
        }
        Ok(min)
    }

    /// Features whose column holds only unknown markers in every instance of
    /// every fold. Such features carry no signal and are force-deselected
    /// during fitness evaluation.
    pub fn all_null_features(&self, feature_count: usize) -> Result<Vec<bool>> {
        let mut all_null = vec![true; feature_count];

        for fold in 0..self.fold_count {
            for line in self.instance_lines(fold)? {
                for (i, token) in line.split(',').take(feature_count).enumerate() {
                    if token != UNKNOWN {
                        all_null[i] = false;
                    }
                }
            }
        }

        let pruned = all_null.iter().filter(|&&n| n).count();
        if pruned > 0 {
            info!(
                "{} of {} features are entirely unknown across all folds and will be pruned",
                pruned, feature_count
            );
        }
        debug!("all-null feature scan complete over {} folds", self.fold_count);
        Ok(all_null)
    }

    fn instance_lines(&self, fold: usize) -> Result<Vec<String>> {
        let path = self.instance_path(fold);
        let file = File::open(&path).map_err(|e| {
            GaError::FoldData(format!("Cannot read fold file {}: {}", path.display(), e))
        })?;

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }
}
