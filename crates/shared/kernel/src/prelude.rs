//! Common imports for slices and apps.

pub use crate::safe_nanoid;
pub use crate::security::resource::{ResourceGuard, ResourceGuardError};
#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiState, ErrorBody};
pub use encore_domain::config::ApiConfig;
pub use encore_domain::registry::{FeatureSlice, InitializedSlice};
