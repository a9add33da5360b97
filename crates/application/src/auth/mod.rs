//! Authentication: the refreshing client, its live bearer, session events
//! and in-memory credential storage.

mod bearer;
mod client;
mod session;
mod token_store;

pub use bearer::BearerState;
pub use client::{AuthenticatedClient, ClientOptions, REFRESH_PATH, RequestPhase};
pub use session::{InvalidationReason, SessionEvent, SessionEvents};
pub use token_store::MemoryCredentialStore;
