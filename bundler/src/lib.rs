//! dbeast bundler library
//!
//! Renders Logstash monitoring configuration templates for a cluster and
//! packages them, with their `pipelines.yml` manifests, into downloadable
//! bundles.

pub mod app;
pub mod bundle;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod probe;
pub mod render;
pub mod server;
pub mod storage;
pub mod templates;
pub mod utils;
