use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesmithError {
    #[error("not initialized: run 'rulesmith init'")]
    NotInitialized,

    #[error("rule document not found: {0}")]
    DocumentNotFound(String),

    #[error("rules directory not found: {}", .0.display())]
    RulesDirNotFound(PathBuf),

    #[error("invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("version {0} cannot be bumped: component overflows u64")]
    VersionOverflow(String),

    #[error("checklist item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid transition for '{item}' from {from} to {to}")]
    InvalidTransition {
        item: String,
        from: String,
        to: String,
    },

    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParens(String),

    #[error("invalid timestamp '{0}': expected RFC 3339")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RulesmithError>;
