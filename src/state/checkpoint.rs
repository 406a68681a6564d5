//! Resume checkpoints.
//!
//! After a run fails, the value table and the failing step's name are saved
//! so a later run can start again at that step with the same values.

use crate::config::values::ValueTable;
use crate::error::{Result, SeqrunError};
use crate::fs::{FileSystem, RESUME_FILE_MODE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Saved state of a failed run.
///
/// # Example
///
/// ```
/// use seqrun::fs::MemoryFileSystem;
/// use seqrun::state::ResumeCheckpoint;
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// let checkpoint = ResumeCheckpoint::new([("Region", "westus2")].into_iter().collect(), "CreateGroup");
/// checkpoint.save(&fs, Path::new("run.resume.json")).unwrap();
///
/// let loaded = ResumeCheckpoint::load(&fs, Path::new("run.resume.json")).unwrap();
/// assert_eq!(loaded.start_at, "CreateGroup");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResumeCheckpoint {
    /// Value table as it stood when the run stopped.
    #[serde(default)]
    pub vals: ValueTable,

    /// Name of the step to start at.
    #[serde(default)]
    pub start_at: String,
}

impl ResumeCheckpoint {
    pub fn new(vals: ValueTable, start_at: impl Into<String>) -> Self {
        Self {
            vals,
            start_at: start_at.into(),
        }
    }

    /// Read a checkpoint file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCheckpoint` if the file is not a checkpoint or its
    /// `StartAt` is blank.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let invalid = |message: String| SeqrunError::InvalidCheckpoint {
            path: path.to_path_buf(),
            message,
        };

        let content = fs.read_to_string(path)?;
        let mut checkpoint: Self =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        checkpoint.start_at = checkpoint.start_at.trim().to_string();
        if checkpoint.start_at.is_empty() {
            return Err(invalid("StartAt cannot be empty".to_string()));
        }
        Ok(checkpoint)
    }

    /// Write the checkpoint as JSON, replacing any existing file.
    pub fn save(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        fs.write_file(path, content.as_bytes(), RESUME_FILE_MODE)?;
        tracing::debug!("Saved resume checkpoint to {}", path.display());
        Ok(())
    }

    /// A fresh file name in the system temp directory.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(format!("{}.resume.json", Uuid::new_v4()))
    }
}
