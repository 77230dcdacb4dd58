use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::MemeResult;

/// Downloadable export result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, extension included.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir` under its own file name and return the full path.
    pub fn write_into(&self, dir: &Path) -> MemeResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}
