//! Bundle assembly
//!
//! Two generation modes share one pipeline: pick the selected templates,
//! substitute placeholders, emit each file and record it in a manifest,
//! then emit the manifest once its scope is complete.
//!
//! * Elasticsearch monitoring: one file set and one `pipelines.yml` for the
//!   whole cluster, stored under `{cluster}-{uuid}/`.
//! * Logstash monitoring: the same file set repeated for every Logstash host
//!   with a host scoped manifest at `{host}/pipelines.yml`.

use std::collections::HashSet;
use std::sync::Arc;

use cluster_models::{Cluster, ClusterIdentity, ConfigurationCheckbox, LogstashHost};
use tracing::{debug, error, info};

use crate::bundle::archive::{check_relative, entry_path, EntrySink};
use crate::errors::BundlerError;
use crate::render::manifest::{pipeline_id, Manifest, CONF_ROOT, MANIFEST_FILE};
use crate::render::placeholder::{
    substitute_cluster_id, substitute_credentials, substitute_host, Environment,
};
use crate::templates::{TemplatePolicy, TemplateRegistry};

/// Folder holding the per-host file set, both in the archive and on the host
pub const HOST_CONF_DIR: &str = "dbeast-mon";

/// The two supported bundle flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    /// Cluster monitoring pipelines, one set per cluster
    Elasticsearch,
    /// Logstash self-monitoring pipelines, one set per Logstash host
    Logstash,
}

impl BundleKind {
    /// File name offered to the browser
    pub fn archive_name(&self) -> &'static str {
        match self {
            BundleKind::Elasticsearch => "ESConfigurationFiles.zip",
            BundleKind::Logstash => "LogstashConfigurationFiles.zip",
        }
    }
}

/// How a failed entry write affects the rest of the bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFailurePolicy {
    /// Stop and fail the whole bundle
    #[default]
    Abort,
    /// Log the failure and keep going
    Continue,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationOptions {
    pub template_policy: TemplatePolicy,
    pub write_failure_policy: WriteFailurePolicy,
}

/// Counts of what ended up in the sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub files: usize,
    pub manifests: usize,
    pub failed: usize,
}

pub struct Assembler {
    registry: Arc<TemplateRegistry>,
    options: GenerationOptions,
}

impl Assembler {
    pub fn new(registry: Arc<TemplateRegistry>, options: GenerationOptions) -> Self {
        Self { registry, options }
    }

    pub async fn assemble(
        &self,
        kind: BundleKind,
        cluster: &Cluster,
        identity: &ClusterIdentity,
        sink: &mut dyn EntrySink,
    ) -> Result<BundleSummary, BundlerError> {
        match kind {
            BundleKind::Elasticsearch => self.assemble_cluster(cluster, identity, sink).await,
            BundleKind::Logstash => self.assemble_hosts(cluster, identity, sink).await,
        }
    }

    /// One file set plus a root `pipelines.yml` for the whole cluster
    pub async fn assemble_cluster(
        &self,
        cluster: &Cluster,
        identity: &ClusterIdentity,
        sink: &mut dyn EntrySink,
    ) -> Result<BundleSummary, BundlerError> {
        let environments = &cluster.cluster_connection_settings;
        let selections = &cluster.logstash_configurations.es_monitoring_configuration_files;
        let folder = identity.slug();

        check_layout(
            selected(selections)
                .map(|checkbox| entry_path(&[&folder, &checkbox.id]))
                .chain([MANIFEST_FILE.to_string()]),
        )?;

        let mut summary = BundleSummary::default();
        let mut manifest = Manifest::for_cluster(identity);

        for checkbox in selected(selections) {
            let template = self.registry.lookup(&checkbox.id, self.options.template_policy)?;
            let text = substitute_cluster_id(template, &identity.id);
            let text = substitute_credentials(&text, &environments.mon.elasticsearch, Environment::Mon);
            let text =
                substitute_credentials(&text, &environments.prod.elasticsearch, Environment::Prod);

            let path = entry_path(&[&folder, &checkbox.id]);
            if self.put(sink, &path, &text, &mut summary).await? {
                summary.files += 1;
            }
            manifest.push(
                pipeline_id(&checkbox.id, Some(identity)),
                format!("{}/{}", CONF_ROOT, path),
            );
        }

        if self.put(sink, MANIFEST_FILE, &manifest.render(), &mut summary).await? {
            summary.manifests += 1;
        }

        info!(
            "Assembled cluster bundle for {}: {} files, {} pipelines",
            folder,
            summary.files,
            manifest.len()
        );
        Ok(summary)
    }

    /// One file set plus a `pipelines.yml` per Logstash host
    pub async fn assemble_hosts(
        &self,
        cluster: &Cluster,
        identity: &ClusterIdentity,
        sink: &mut dyn EntrySink,
    ) -> Result<BundleSummary, BundlerError> {
        let logstash = &cluster
            .logstash_configurations
            .logstash_monitoring_configuration_files;

        let configurations = &logstash.configurations;
        check_layout(logstash.hosts.iter().flat_map(|host| {
            selected(configurations)
                .map(move |checkbox| {
                    entry_path(&[&host.server_address, HOST_CONF_DIR, &checkbox.id])
                })
                .chain([entry_path(&[&host.server_address, MANIFEST_FILE])])
        }))?;

        let mut summary = BundleSummary::default();
        for host in &logstash.hosts {
            self.assemble_host(cluster, identity, host, configurations, sink, &mut summary)
                .await?;
        }

        info!(
            "Assembled Logstash bundle for {} hosts: {} files",
            logstash.hosts.len(),
            summary.files
        );
        Ok(summary)
    }

    async fn assemble_host(
        &self,
        cluster: &Cluster,
        identity: &ClusterIdentity,
        host: &LogstashHost,
        selections: &[ConfigurationCheckbox],
        sink: &mut dyn EntrySink,
        summary: &mut BundleSummary,
    ) -> Result<(), BundlerError> {
        let mon = &cluster.cluster_connection_settings.mon.elasticsearch;
        let mut manifest = Manifest::for_host();

        for checkbox in selected(selections) {
            let template = self.registry.lookup(&checkbox.id, self.options.template_policy)?;
            let text = substitute_cluster_id(template, &identity.id);
            let text = substitute_credentials(&text, mon, Environment::Mon);
            let text = substitute_host(&text, host);

            let path = entry_path(&[&host.server_address, HOST_CONF_DIR, &checkbox.id]);
            if self.put(sink, &path, &text, summary).await? {
                summary.files += 1;
            }
            manifest.push(
                pipeline_id(&checkbox.id, None),
                format!("{}/{}/{}", CONF_ROOT, HOST_CONF_DIR, checkbox.id),
            );
        }

        let manifest_path = entry_path(&[&host.server_address, MANIFEST_FILE]);
        if self.put(sink, &manifest_path, &manifest.render(), summary).await? {
            summary.manifests += 1;
        }
        if manifest.is_empty() {
            debug!("Host {}: no pipelines selected", host.server_address);
        } else {
            let ids: Vec<&str> = manifest
                .entries()
                .iter()
                .map(|entry| entry.pipeline_id.as_str())
                .collect();
            debug!("Host {}: pipelines {}", host.server_address, ids.join(", "));
        }
        Ok(())
    }

    /// Returns whether the entry was stored
    async fn put(
        &self,
        sink: &mut dyn EntrySink,
        path: &str,
        content: &str,
        summary: &mut BundleSummary,
    ) -> Result<bool, BundlerError> {
        match sink.put(path, content).await {
            Ok(()) => Ok(true),
            Err(e) => match self.options.write_failure_policy {
                WriteFailurePolicy::Abort => Err(e),
                WriteFailurePolicy::Continue => {
                    error!("Skipping entry {}: {}", path, e);
                    summary.failed += 1;
                    Ok(false)
                }
            },
        }
    }
}

/// Rejects bundles whose entries would escape the bundle root or overwrite each other
fn check_layout(paths: impl IntoIterator<Item = String>) -> Result<(), BundlerError> {
    let mut seen = HashSet::new();
    for path in paths {
        check_relative(&path)?;
        if !seen.insert(path.clone()) {
            return Err(BundlerError::InvalidPath(format!("duplicate entry {}", path)));
        }
    }
    Ok(())
}

fn selected(checkboxes: &[ConfigurationCheckbox]) -> impl Iterator<Item = &ConfigurationCheckbox> {
    checkboxes.iter().filter(|c| c.is_checked)
}
