use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown classifier id: {0}")]
    UnknownClassifier(u32),

    #[error("Evaluation failed in generation {generation} for genome {genome}: {message}")]
    Evaluation {
        generation: usize,
        genome: String,
        message: String,
    },

    #[error("Evaluator error: {0}")]
    Evaluator(String),

    #[error("Fold data error: {0}")]
    FoldData(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GaError>;
