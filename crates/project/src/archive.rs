use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::config::ProjectConfig;
use crate::error::ProjectError;

/// An opened project archive, extracted into a scoped working directory.
///
/// The working directory lives exactly as long as this value: dropping the
/// archive removes the extracted files on every exit path, including error
/// returns and unwinds. The source archive itself is never written to.
#[derive(Debug)]
pub struct ProjectArchive {
    config: ProjectConfig,
    root: PathBuf,
    _workdir: TempDir,
}

impl ProjectArchive {
    /// Open `path`, parse `project.json` from inside the zip, and extract
    /// the archive contents under `<workdir>/<project id>/`.
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        let file = File::open(path)
            .map_err(|e| ProjectError::ArchiveUnreadable(format!("{}: {e}", path.display())))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| ProjectError::ArchiveUnreadable(format!("{}: {e}", path.display())))?;

        // Config first: the project id names the extraction subdirectory
        let config: ProjectConfig = {
            let entry = archive
                .by_name("project.json")
                .map_err(|_| ProjectError::ConfigParse("project.json not in archive".into()))?;
            serde_json::from_reader(entry)
                .map_err(|e| ProjectError::ConfigParse(e.to_string()))?
        };

        let workdir = TempDir::new()
            .map_err(|e| ProjectError::ArchiveUnreadable(format!("temp dir: {e}")))?;
        let root = workdir.path().join(&config.id);
        archive
            .extract(&root)
            .map_err(|e| ProjectError::ArchiveUnreadable(e.to_string()))?;

        Ok(Self { config, root, _workdir: workdir })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Directory the archive was extracted into (the per-project `id` dir).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the raw dataset file inside the extracted archive.
    pub fn dataset_path(&self) -> PathBuf {
        self.root.join("data").join(&self.config.dataset_path)
    }

    /// Path of the first review's SQLite state store.
    pub fn state_path(&self) -> Result<PathBuf, ProjectError> {
        let review = self.config.reviews.first().ok_or(ProjectError::NoReview)?;
        Ok(self.root.join("reviews").join(&review.id).join("results.sql"))
    }

    /// Model settings metadata for the first review. Projects that never
    /// configured a model have no settings file; that reads as empty.
    pub fn settings_metadata(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ProjectError> {
        let review = match self.config.reviews.first() {
            Some(r) => r,
            None => return Ok(serde_json::Map::new()),
        };
        let path = self
            .root
            .join("reviews")
            .join(&review.id)
            .join("settings_metadata.json");
        if !path.exists() {
            return Ok(serde_json::Map::new());
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ProjectError::ConfigParse(format!("{}: {e}", path.display())))?;
        match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(ProjectError::ConfigParse(
                "settings_metadata.json is not a JSON object".into(),
            )),
            Err(e) => Err(ProjectError::ConfigParse(e.to_string())),
        }
    }
}
