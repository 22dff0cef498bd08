//! Configuration file templates

pub mod registry;

pub use registry::{TemplatePolicy, TemplateRegistry};
