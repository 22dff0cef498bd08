//! Bundle assembly and archive output

pub mod archive;
pub mod assembler;

pub use archive::{DiskSink, EntrySink, ZipSink};
pub use assembler::{Assembler, BundleKind, BundleSummary, GenerationOptions, WriteFailurePolicy};
