//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Where the bundler finds its settings and templates and saves output
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    pub fn templates_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("templates"))
    }

    pub fn output_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("logstash_configurations"))
    }
}

impl Default for StorageLayout {
    /// The folder holding the executable, so templates ship next to the binary
    fn default() -> Self {
        let base_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base_dir)
    }
}
