//! Server state

use std::sync::Arc;

use crate::bundle::{Assembler, GenerationOptions};
use crate::filesys::dir::Dir;
use crate::probe::ClusterProbe;
use crate::templates::TemplateRegistry;

/// Server state shared across handlers
pub struct ServerState {
    pub registry: Arc<TemplateRegistry>,
    pub probe: Arc<dyn ClusterProbe>,
    pub generation: GenerationOptions,
    /// Root folder for the save-to-disk routes
    pub output_dir: Dir,
}

impl ServerState {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        probe: Arc<dyn ClusterProbe>,
        generation: GenerationOptions,
        output_dir: Dir,
    ) -> Self {
        Self {
            registry,
            probe,
            generation,
            output_dir,
        }
    }

    pub fn assembler(&self) -> Assembler {
        Assembler::new(self.registry.clone(), self.generation)
    }
}
