use std::path::PathBuf;

use sm_common::{MatchError, OntologyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read batch input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid batch input: {0}")]
    InputFormat(#[from] serde_json::Error),
    #[error(transparent)]
    Ontology(#[from] OntologyError),
    #[error("pair {index} failed: {source}")]
    Pair {
        index: usize,
        #[source]
        source: MatchError,
    },
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
