//! `pipelines.yml` generation

use std::fmt::Write;

use cluster_models::ClusterIdentity;

/// Name of the manifest file inside a bundle scope
pub const MANIFEST_FILE: &str = "pipelines.yml";

/// Logstash pipeline configuration root on the deployed host
pub const CONF_ROOT: &str = "/etc/logstash/conf.d";

const CONF_EXTENSION: &str = ".conf";

/// Derive a pipeline id from a template file id.
///
/// Every ".conf" occurrence is dropped; cluster scoped pipelines get the
/// `-{name}-{id}` suffix so several clusters can share one Logstash.
pub fn pipeline_id(file_id: &str, identity: Option<&ClusterIdentity>) -> String {
    let base = file_id.replace(CONF_EXTENSION, "");
    match identity {
        Some(identity) => format!("{}-{}", base, identity.slug()),
        None => base,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub pipeline_id: String,
    pub path_config: String,
}

/// Ordered pipeline list for one bundle scope
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    header: Option<String>,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Manifest for a whole cluster, starting with an identifying comment
    pub fn for_cluster(identity: &ClusterIdentity) -> Self {
        Self {
            header: Some(format!(
                "### Configuration files for the cluster: {}, clusterId: {}",
                identity.name, identity.id
            )),
            entries: Vec::new(),
        }
    }

    /// Manifest scoped to one Logstash host
    pub fn for_host() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pipeline_id: impl Into<String>, path_config: impl Into<String>) {
        self.entries.push(ManifestEntry {
            pipeline_id: pipeline_id.into(),
            path_config: path_config.into(),
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(header);
            out.push('\n');
        }
        for entry in &self.entries {
            // writing into a String cannot fail
            let _ = write!(
                out,
                "- pipeline.id: {}\n  path.config: \"{}\"\n\n",
                entry.pipeline_id, entry.path_config
            );
        }
        out
    }
}
