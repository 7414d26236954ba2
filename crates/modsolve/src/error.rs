use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::solver::ResolutionFailure;
use crate::validation::InvalidIdError;

#[derive(Error, Debug)]
pub enum ResolverError {
    // Metadata errors
    #[error("Invalid mod metadata in {origin}: {message}")]
    Schema { origin: String, message: String },

    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),

    // Discovery errors
    #[error("Mod discovery did not finish within {}s", .timeout.as_secs_f64())]
    DiscoveryTimeout { timeout: Duration },

    #[error("Failed to read {}: {source}", .path.display())]
    DiscoveryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Discovery task failed: {0}")]
    TaskFailed(String),

    #[error("{}", join_errors(.0))]
    Aggregate(Vec<ResolverError>),

    // Resolution errors
    #[error("{0}")]
    Resolution(ResolutionFailure),

    #[error("Internal resolver error: {} candidates selected for mod id '{id}' ({})", .selected.len(), .selected.join(", "))]
    InternalInvariant { id: String, selected: Vec<String> },

    // Lifecycle errors
    #[error("Invalid resolution state: {0}")]
    Lifecycle(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolverError::DiscoveryIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ResolverError::Archive {
            path: path.into(),
            source,
        }
    }

    /// Merge several errors into one, flattening nested aggregates
    pub fn aggregate(errors: Vec<ResolverError>) -> Option<Self> {
        let mut flat = Vec::with_capacity(errors.len());
        for error in errors {
            match error {
                ResolverError::Aggregate(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(ResolverError::Aggregate(flat)),
        }
    }

    /// The resolution failure carried by this error, if any
    pub fn resolution_failure(&self) -> Option<&ResolutionFailure> {
        match self {
            ResolverError::Resolution(failure) => Some(failure),
            _ => None,
        }
    }
}

fn join_errors(errors: &[ResolverError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, ResolverError>;
