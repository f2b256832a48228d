//! Shared HTTP plumbing: application state, error responses and system routes.

mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ErrorBody};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
