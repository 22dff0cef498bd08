//! Template rendering: placeholder substitution and manifests

pub mod manifest;
pub mod placeholder;
