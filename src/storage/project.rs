use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::SqliteStore;
use crate::config::Config;
use crate::error::{IdeaflowError, Result};

pub const IDEAFLOW_DIR: &str = ".ideaflow";

/// Find the project root by looking for .ideaflow/ or .git/
pub fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(IDEAFLOW_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

/// An initialized `.ideaflow/` directory with its configuration
pub struct Project {
    dir: PathBuf,
    pub config: Config,
}

impl Project {
    /// Create `.ideaflow/` under `root` with a default config and an empty database
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(IDEAFLOW_DIR);
        if dir.exists() {
            return Err(IdeaflowError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;
        let config = Config::default();
        config.save(&dir)?;

        let project = Self { dir, config };
        project.store()?;
        tracing::info!(dir = %project.dir().display(), "initialized ideaflow project");
        Ok(project)
    }

    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(IDEAFLOW_DIR);
        if !dir.is_dir() {
            return Err(IdeaflowError::NotInitialized);
        }
        let config = Config::load(&dir)?;
        Ok(Self { dir, config })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn database_path(&self) -> PathBuf {
        self.dir.join(&self.config.database)
    }

    pub fn store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.database_path())
    }
}
