use std::fmt;

use revstate_project::ProjectError;
use revstate_table::TableError;

use crate::format::OutputFormat;

#[derive(Debug)]
pub enum ExtractError {
    /// Project archive cannot be opened or extracted.
    ArchiveUnreadable(String),
    /// The configured dataset file is absent from the extracted archive.
    DatasetMissing(String),
    /// The dataset file exists but cannot be parsed.
    DatasetUnreadable(String),
    /// The state store cannot be opened or a required accessor failed.
    StateUnreadable(String),
    /// Requested output format is not in the accepted set.
    InvalidFormat(String),
    /// Output path not writable.
    WriteFailure { path: String, message: String },
    /// Internal join error (column collision in the merged table).
    Merge(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchiveUnreadable(msg) => write!(f, "cannot read project archive: {msg}"),
            Self::DatasetMissing(path) => write!(f, "dataset file not found: {path}"),
            Self::DatasetUnreadable(msg) => write!(f, "cannot read dataset: {msg}"),
            Self::StateUnreadable(msg) => write!(f, "cannot read review state: {msg}"),
            Self::InvalidFormat(value) => write!(
                f,
                "unknown output format '{value}' (expected one of: {})",
                OutputFormat::ACCEPTED.join(", ")
            ),
            Self::WriteFailure { path, message } => {
                write!(f, "cannot write {path}: {message}")
            }
            Self::Merge(msg) => write!(f, "merge failed: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ProjectError> for ExtractError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::ArchiveUnreadable(msg) => Self::ArchiveUnreadable(msg),
            ProjectError::ConfigParse(msg) => Self::ArchiveUnreadable(msg),
            ProjectError::NoReview => {
                Self::StateUnreadable("project configuration lists no reviews".into())
            }
            ProjectError::StateUnreadable(msg) => Self::StateUnreadable(msg),
        }
    }
}

impl From<TableError> for ExtractError {
    fn from(err: TableError) -> Self {
        Self::Merge(err.to_string())
    }
}
