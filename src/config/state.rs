// Application state module
// Immutable per-process state shared by every connection

use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Directory files are served from, fixed at startup
    root: PathBuf,
}

impl AppState {
    /// Create `AppState` serving files from `root`
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    /// Create `AppState` serving the process's current working directory
    pub fn from_current_dir(config: Config) -> std::io::Result<Self> {
        Ok(Self::new(config, std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
