use std::path::PathBuf;
use thiserror::Error;

use crate::recall::Phase;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read content file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("content has no parts")]
    NoParts,

    #[error("unit {unit} of part \"{part}\" has no vocabulary")]
    EmptyUnit { part: String, unit: u32 },

    #[error("item {id} has an empty {field}")]
    MissingField { id: u32, field: &'static str },

    #[error("unit {unit} has a grammar topic without a title or explanation")]
    EmptyGrammar { unit: u32 },

    #[error("duplicate item id {0}")]
    DuplicateId(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("the session is already complete")]
    Complete,

    #[error("cannot {action} during {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("round size must be at least 1")]
    InvalidRoundSize,
}
