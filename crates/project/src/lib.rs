// Review project archives - extraction, configuration, state store

mod archive;
mod config;
mod error;
mod state;

pub use archive::ProjectArchive;
pub use config::{ProjectConfig, ReviewEntry};
pub use error::ProjectError;
pub use state::{StateStore, PROBABILITIES_COLUMN};
