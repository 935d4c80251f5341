use std::fmt;

#[derive(Debug)]
pub enum ProjectError {
    /// Archive missing, not a zip container, or extraction failed.
    ArchiveUnreadable(String),
    /// project.json absent from the archive or not valid JSON.
    ConfigParse(String),
    /// The project configuration lists no review, so there is no state store.
    NoReview,
    /// State store cannot be opened or a query failed.
    StateUnreadable(String),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchiveUnreadable(msg) => write!(f, "cannot read project archive: {msg}"),
            Self::ConfigParse(msg) => write!(f, "cannot read project configuration: {msg}"),
            Self::NoReview => write!(f, "project configuration lists no reviews"),
            Self::StateUnreadable(msg) => write!(f, "cannot read state store: {msg}"),
        }
    }
}

impl std::error::Error for ProjectError {}
