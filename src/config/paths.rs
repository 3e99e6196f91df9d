//! Filesystem locations used by the server

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolved data locations
#[derive(Debug, Clone)]
pub struct Paths {
    data_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform data directory and make sure it exists
    pub fn resolve() -> Result<Self> {
        let data_dir = directories::ProjectDirs::from("", "", "soundshelf")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".soundshelf"));

        Self::at(data_dir)
    }

    /// Use an explicit data directory, creating it when missing
    pub fn at(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the catalog database path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("soundshelf.db")
    }
}
