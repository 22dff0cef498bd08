//! Cluster description models
//!
//! Wire types shared by the bundle generator and the HTTP boundary.

pub mod models;

pub use models::*;
