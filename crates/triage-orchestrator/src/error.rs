//! Error types for the intake workflow

use thiserror::Error;
use triage_domain::{Modality, RunId};

/// Boxed collaborator error
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a run
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// A run is already in progress
    #[error("A triage run is already in progress")]
    Busy,

    /// An extraction call failed; the whole fan-out is discarded
    #[error("{modality} extraction failed: {source}")]
    Extraction {
        /// Modality whose call failed first
        modality: Modality,
        /// Collaborator error
        #[source]
        source: SourceError,
    },

    /// The triage call failed
    #[error("Triage failed: {0}")]
    Triage(#[source] SourceError),

    /// The session was discarded while the run was in flight
    #[error("Run {0} was superseded; its result was discarded")]
    Superseded(RunId),
}

impl OrchestratorError {
    /// Collaborator error behind this failure, if any
    pub fn collaborator_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            OrchestratorError::Extraction { source, .. } => Some(source.as_ref()),
            OrchestratorError::Triage(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors raised while selecting inputs
#[derive(Error, Debug)]
pub enum InputError {
    /// Media type not accepted for the modality
    #[error("{modality} slot does not accept media type '{media_type}'")]
    MediaKind {
        /// Target modality
        modality: Modality,
        /// Rejected media type
        media_type: String,
    },

    /// Selected file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Body(&'static str);

    impl fmt::Display for Body {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Body {}

    #[test]
    fn test_extraction_message_includes_source() {
        let err = OrchestratorError::Extraction {
            modality: Modality::Document,
            source: Box::new(Body("corrupt file")),
        };
        assert_eq!(err.to_string(), "document extraction failed: corrupt file");
        assert!(err.collaborator_error().is_some());
    }

    #[test]
    fn test_busy_has_no_source() {
        assert!(OrchestratorError::Busy.collaborator_error().is_none());
    }
}
