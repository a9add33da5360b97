//! Deterministic JSON serialization for files on disk.

mod json;

pub use json::*;
