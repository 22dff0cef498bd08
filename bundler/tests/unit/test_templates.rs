//! Template registry loading tests

use dbeast_bundler::errors::BundlerError;
use dbeast_bundler::filesys::dir::Dir;
use dbeast_bundler::templates::{TemplatePolicy, TemplateRegistry};

#[tokio::test]
async fn test_load_keys_templates_by_file_name() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("cluster-health.conf"), "input { <PROD_HOST> }").unwrap();
    std::fs::write(tmp.path().join("nodes.conf"), "output { <MON_HOST> }").unwrap();
    // nested folders are not templates
    std::fs::create_dir(tmp.path().join("drafts")).unwrap();
    std::fs::write(tmp.path().join("drafts").join("old.conf"), "old").unwrap();

    let registry = TemplateRegistry::load(&Dir::new(tmp.path())).await.unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.ids(), ["cluster-health.conf", "nodes.conf"]);
    assert_eq!(registry.get("nodes.conf"), Some("output { <MON_HOST> }"));
    assert_eq!(registry.get("old.conf"), None);
}

#[tokio::test]
async fn test_load_skips_non_utf8_files() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("good.conf"), "ok").unwrap();
    std::fs::write(tmp.path().join("binary.conf"), [0xff, 0xfe, 0x00]).unwrap();

    let registry = TemplateRegistry::load(&Dir::new(tmp.path())).await.unwrap();

    assert_eq!(registry.ids(), ["good.conf"]);
}

#[tokio::test]
async fn test_load_missing_folder_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let result = TemplateRegistry::load(&Dir::new(tmp.path().join("absent"))).await;
    assert!(matches!(result, Err(BundlerError::ConfigError(_))));
}

#[tokio::test]
async fn test_lookup_policies() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("a.conf"), "a").unwrap();
    let registry = TemplateRegistry::load(&Dir::new(tmp.path())).await.unwrap();

    assert_eq!(registry.lookup("a.conf", TemplatePolicy::Strict).unwrap(), "a");
    assert_eq!(registry.lookup("b.conf", TemplatePolicy::Lenient).unwrap(), "");
    assert!(matches!(
        registry.lookup("b.conf", TemplatePolicy::Strict),
        Err(BundlerError::TemplateNotFound(_))
    ));
}
