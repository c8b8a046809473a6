use std::path::{Path, PathBuf};
use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

/// Structural failures. Optional extraction problems never surface here;
/// they leave the corresponding field absent instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("required input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {}: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error("malformed feature line {line}: {reason}")]
    MalformedFeature { line: usize, reason: String },

    #[error("summary table out of step with feature table at feature line {line}: {reason}")]
    MisalignedSummary { line: usize, reason: String },

    #[error("external tool failed for {sample}: `{command}`: {reason}")]
    ExternalTool {
        sample: String,
        command: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ReportError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Like [`ReportError::io`], but a vanished file is reported as a missing input.
    pub(crate) fn input(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return ReportError::MissingInput(path.as_ref().to_path_buf());
        }
        Self::io(path, source)
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}
