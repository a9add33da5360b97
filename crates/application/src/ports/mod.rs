//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod credential_store;
mod file_system;
mod http_transport;

pub use clock::Clock;
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use file_system::{FileSystem, FileSystemError};
pub use http_transport::{HttpClientError, HttpTransport};
