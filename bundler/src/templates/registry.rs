//! Template registry
//!
//! Maps a configuration file id (the template's file name) to its raw text.
//! Built once at startup and never mutated afterwards; request handlers share
//! it through an `Arc`.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::errors::BundlerError;
use crate::filesys::dir::Dir;

/// What to do when a selected template id is not in the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplatePolicy {
    /// Render the file with an empty body
    #[default]
    Lenient,
    /// Fail the whole bundle
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn from_map(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// Load every regular file of `dir`, keyed by file name.
    pub async fn load(dir: &Dir) -> Result<Self, BundlerError> {
        if !dir.exists().await {
            return Err(BundlerError::ConfigError(format!(
                "Templates folder not found: {}",
                dir.path().display()
            )));
        }

        let mut templates = HashMap::new();
        for file in dir.list_files().await? {
            let Some(name) = file.name().map(str::to_string) else {
                warn!("Skipping template with a non UTF-8 name: {}", file.path().display());
                continue;
            };
            match file.read_string().await {
                Ok(text) => {
                    debug!("Loaded template {}", name);
                    templates.insert(name, text);
                }
                Err(e) => warn!("Skipping unreadable template {}: {}", name, e),
            }
        }

        info!(
            "Loaded {} templates from {}",
            templates.len(),
            dir.path().display()
        );
        Ok(Self { templates })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(String::as_str)
    }

    pub fn lookup(&self, id: &str, policy: TemplatePolicy) -> Result<&str, BundlerError> {
        match (self.get(id), policy) {
            (Some(text), _) => Ok(text),
            (None, TemplatePolicy::Lenient) => {
                warn!("Template {} is not loaded, rendering it empty", id);
                Ok("")
            }
            (None, TemplatePolicy::Strict) => Err(BundlerError::TemplateNotFound(id.to_string())),
        }
    }

    /// Loaded template ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
