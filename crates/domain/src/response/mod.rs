//! HTTP Response domain types

mod error_body;
mod spec;

pub use error_body::{ErrorBody, NON_FIELD_ERRORS};
pub use spec::{ApiResponse, StatusCode};
