//! Account and session use cases.

mod login;
mod logout;
mod profile;
mod register;
mod restore_session;
mod session_status;

pub use login::*;
pub use logout::*;
pub use profile::*;
pub use register::*;
pub use restore_session::*;
pub use session_status::*;
