use std::path::PathBuf;

use thiserror::Error;

/// Failures of the application shell. The simulation itself never fails.
#[derive(Error, Debug)]
pub enum AppError {
    /// SDL reports errors as plain strings.
    #[error("SDL {stage} failed: {message}")]
    Sdl { stage: &'static str, message: String },

    #[error("could not read tuning file {path}: {source}")]
    TuningIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse tuning file {path}: {source}")]
    TuningParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

impl AppError {
    pub fn sdl(stage: &'static str, message: impl ToString) -> Self {
        Self::Sdl {
            stage,
            message: message.to_string(),
        }
    }
}
