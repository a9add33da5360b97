//! Tradepost Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestTransport, SystemClock};
pub use config::{ClientConfig, ConfigError};
pub use persistence::{FileCredentialStore, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
