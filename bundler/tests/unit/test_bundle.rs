//! Bundle assembly tests

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use cluster_models::{Cluster, ClusterIdentity, ConfigurationCheckbox, Credentials, LogstashHost};
use dbeast_bundler::bundle::{Assembler, BundleKind, GenerationOptions, ZipSink};
use dbeast_bundler::errors::BundlerError;
use dbeast_bundler::templates::TemplateRegistry;
use zip::ZipArchive;

fn registry(templates: &[(&str, &str)]) -> Arc<TemplateRegistry> {
    let map: HashMap<String, String> = templates
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect();
    Arc::new(TemplateRegistry::from_map(map))
}

fn checkbox(id: &str, is_checked: bool) -> ConfigurationCheckbox {
    ConfigurationCheckbox {
        label: id.to_string(),
        id: id.to_string(),
        is_checked,
    }
}

fn host(address: &str) -> LogstashHost {
    LogstashHost {
        server_address: address.to_string(),
        logstash_api_host: format!("http://{}:9600", address),
        logstash_logs_folder: format!("/var/log/{}", address),
    }
}

fn cluster() -> Cluster {
    let mut cluster = Cluster::default();
    let env = &mut cluster.cluster_connection_settings;
    env.prod.elasticsearch = Credentials {
        host: "https://es.acme.com".to_string(),
        authentication_enabled: true,
        username: "prod-user".to_string(),
        password: "prod-pass".to_string(),
        status: String::new(),
    };
    env.mon.elasticsearch = Credentials {
        host: "http://mon.acme.com:9200".to_string(),
        authentication_enabled: true,
        username: "mon-user".to_string(),
        password: "mon-pass".to_string(),
        status: String::new(),
    };
    cluster
}

async fn build(
    assembler: &Assembler,
    kind: BundleKind,
    cluster: &Cluster,
    identity: &ClusterIdentity,
) -> ZipArchive<Cursor<Vec<u8>>> {
    let mut sink = ZipSink::new();
    assembler
        .assemble(kind, cluster, identity, &mut sink)
        .await
        .unwrap();
    ZipArchive::new(Cursor::new(sink.finish().unwrap())).unwrap()
}

fn read(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn names(archive: &ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_cluster_bundle_end_to_end() {
    let assembler = Assembler::new(
        registry(&[("health.conf", "<CLUSTER_ID> <PROD_HOST> <PROD_SSL_ENABLED>")]),
        GenerationOptions::default(),
    );
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files =
        vec![checkbox("health.conf", true)];
    let identity = ClusterIdentity::new("acme", "c1");

    let mut archive = build(&assembler, BundleKind::Elasticsearch, &cluster, &identity).await;

    assert_eq!(read(&mut archive, "acme-c1/health.conf"), "c1 https://es.acme.com true");
    let manifest = read(&mut archive, "pipelines.yml");
    assert!(manifest.contains("- pipeline.id: health-acme-c1\n"));
    assert!(manifest.contains("  path.config: \"/etc/logstash/conf.d/acme-c1/health.conf\"\n"));
}

#[tokio::test]
async fn test_cluster_bundle_skips_unselected() {
    let assembler = Assembler::new(
        registry(&[("a.conf", "a"), ("b.conf", "b"), ("c.conf", "c")]),
        GenerationOptions::default(),
    );
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files = vec![
        checkbox("c.conf", true),
        checkbox("b.conf", false),
        checkbox("a.conf", true),
    ];
    let identity = ClusterIdentity::new("acme", "c1");

    let mut archive = build(&assembler, BundleKind::Elasticsearch, &cluster, &identity).await;

    assert_eq!(
        names(&archive),
        ["acme-c1/a.conf", "acme-c1/c.conf", "pipelines.yml"]
    );
    let manifest = read(&mut archive, "pipelines.yml");
    assert_eq!(
        manifest,
        "### Configuration files for the cluster: acme, clusterId: c1\n\
         - pipeline.id: c-acme-c1\n  path.config: \"/etc/logstash/conf.d/acme-c1/c.conf\"\n\n\
         - pipeline.id: a-acme-c1\n  path.config: \"/etc/logstash/conf.d/acme-c1/a.conf\"\n\n"
    );
    assert!(!manifest.contains("b-acme-c1"));
}

#[tokio::test]
async fn test_cluster_bundle_substitutes_both_environments() {
    let template = "in: <MON_HOST> <MON_USER> <MON_PASSWORD> <MON_SSL_ENABLED>\n\
                    out: <PROD_HOST> <PROD_USER> <PROD_PASSWORD> <PROD_SSL_ENABLED>\n\
                    keep: <PATH_TO_LOGS>";
    let assembler = Assembler::new(registry(&[("x.conf", template)]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files =
        vec![checkbox("x.conf", true)];

    let mut archive = build(
        &assembler,
        BundleKind::Elasticsearch,
        &cluster,
        &ClusterIdentity::new("acme", "c1"),
    )
    .await;

    assert_eq!(
        read(&mut archive, "acme-c1/x.conf"),
        "in: http://mon.acme.com:9200 mon-user mon-pass false\n\
         out: https://es.acme.com prod-user prod-pass true\n\
         keep: <PATH_TO_LOGS>"
    );
}

#[tokio::test]
async fn test_cluster_bundle_with_empty_selection() {
    let assembler = Assembler::new(registry(&[("a.conf", "a")]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files =
        vec![checkbox("a.conf", false)];

    let mut archive = build(
        &assembler,
        BundleKind::Elasticsearch,
        &cluster,
        &ClusterIdentity::new("acme", "c1"),
    )
    .await;

    assert_eq!(names(&archive), ["pipelines.yml"]);
    assert_eq!(
        read(&mut archive, "pipelines.yml"),
        "### Configuration files for the cluster: acme, clusterId: c1\n"
    );
}

#[tokio::test]
async fn test_missing_template_renders_empty_by_default() {
    let assembler = Assembler::new(registry(&[]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files =
        vec![checkbox("unknown.conf", true)];

    let mut archive = build(
        &assembler,
        BundleKind::Elasticsearch,
        &cluster,
        &ClusterIdentity::new("acme", "c1"),
    )
    .await;

    assert_eq!(read(&mut archive, "acme-c1/unknown.conf"), "");
    assert!(read(&mut archive, "pipelines.yml").contains("pipeline.id: unknown-acme-c1"));
}

#[tokio::test]
async fn test_host_bundle_fans_out_per_host() {
    let assembler = Assembler::new(
        registry(&[
            ("nodes.conf", "<CLUSTER_ID> <MON_HOST> <LOGSTASH-API> <PATH_TO_LOGS> <PROD_HOST>"),
            ("pipelines-stats.conf", "stats"),
            ("unused.conf", "unused"),
        ]),
        GenerationOptions::default(),
    );
    let mut cluster = cluster();
    let logstash = &mut cluster
        .logstash_configurations
        .logstash_monitoring_configuration_files;
    logstash.configurations = vec![
        checkbox("nodes.conf", true),
        checkbox("unused.conf", false),
        checkbox("pipelines-stats.conf", true),
    ];
    logstash.hosts = vec![host("ls-1"), host("ls-2"), host("ls-3")];
    let identity = ClusterIdentity::new("acme", "c1");

    let mut archive = build(&assembler, BundleKind::Logstash, &cluster, &identity).await;

    // 3 hosts x 2 selected files + 3 manifests
    assert_eq!(archive.len(), 9);
    assert_eq!(
        read(&mut archive, "ls-2/dbeast-mon/nodes.conf"),
        "c1 http://mon.acme.com:9200 http://ls-2:9600 /var/log/ls-2 <PROD_HOST>"
    );

    for address in ["ls-1", "ls-2", "ls-3"] {
        let manifest = read(&mut archive, &format!("{}/pipelines.yml", address));
        assert_eq!(
            manifest,
            "- pipeline.id: nodes\n  path.config: \"/etc/logstash/conf.d/dbeast-mon/nodes.conf\"\n\n\
             - pipeline.id: pipelines-stats\n  \
             path.config: \"/etc/logstash/conf.d/dbeast-mon/pipelines-stats.conf\"\n\n"
        );
    }
}

#[tokio::test]
async fn test_host_bundle_without_hosts_is_empty() {
    let assembler = Assembler::new(registry(&[("nodes.conf", "n")]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster
        .logstash_configurations
        .logstash_monitoring_configuration_files
        .configurations = vec![checkbox("nodes.conf", true)];

    let archive = build(
        &assembler,
        BundleKind::Logstash,
        &cluster,
        &ClusterIdentity::new("acme", "c1"),
    )
    .await;

    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn test_host_bundle_with_empty_selection_has_empty_manifests() {
    let assembler = Assembler::new(registry(&[("nodes.conf", "n")]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster
        .logstash_configurations
        .logstash_monitoring_configuration_files
        .hosts = vec![host("ls-1")];

    let mut archive = build(
        &assembler,
        BundleKind::Logstash,
        &cluster,
        &ClusterIdentity::new("acme", "c1"),
    )
    .await;

    assert_eq!(names(&archive), ["ls-1/pipelines.yml"]);
    assert_eq!(read(&mut archive, "ls-1/pipelines.yml"), "");
}

async fn try_build(
    assembler: &Assembler,
    kind: BundleKind,
    cluster: &Cluster,
) -> (Result<(), BundlerError>, usize) {
    let mut sink = ZipSink::new();
    let result = assembler
        .assemble(kind, cluster, &ClusterIdentity::new("acme", "c1"), &mut sink)
        .await
        .map(|_| ());
    (result, sink.entries())
}

#[tokio::test]
async fn test_host_bundle_rejects_colliding_addresses() {
    let assembler = Assembler::new(registry(&[("nodes.conf", "n")]), GenerationOptions::default());
    let mut cluster = cluster();
    let logstash = &mut cluster
        .logstash_configurations
        .logstash_monitoring_configuration_files;
    logstash.configurations = vec![checkbox("nodes.conf", true)];
    logstash.hosts = vec![host(""), host("")];

    let (result, written) = try_build(&assembler, BundleKind::Logstash, &cluster).await;

    assert!(matches!(result, Err(BundlerError::InvalidPath(_))));
    assert_eq!(written, 0);
}

#[tokio::test]
async fn test_host_bundle_rejects_escaping_address() {
    let assembler = Assembler::new(registry(&[("nodes.conf", "n")]), GenerationOptions::default());
    let mut cluster = cluster();
    let logstash = &mut cluster
        .logstash_configurations
        .logstash_monitoring_configuration_files;
    logstash.configurations = vec![checkbox("nodes.conf", true)];
    logstash.hosts = vec![host("ls-1"), host("../x")];

    let (result, written) = try_build(&assembler, BundleKind::Logstash, &cluster).await;

    assert!(matches!(result, Err(BundlerError::InvalidPath(path)) if path.starts_with("../x")));
    // nothing is written for the valid host either
    assert_eq!(written, 0);
}

#[tokio::test]
async fn test_cluster_bundle_rejects_repeated_selection() {
    let assembler = Assembler::new(registry(&[("a.conf", "a")]), GenerationOptions::default());
    let mut cluster = cluster();
    cluster.logstash_configurations.es_monitoring_configuration_files =
        vec![checkbox("a.conf", true), checkbox("a.conf", true)];

    let (result, written) = try_build(&assembler, BundleKind::Elasticsearch, &cluster).await;

    assert!(matches!(result, Err(BundlerError::InvalidPath(_))));
    assert_eq!(written, 0);
}
