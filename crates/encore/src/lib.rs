//! Facade crate for the Encore catalog platform.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `encore` with the `server` feature.
//! - Call `encore::init` to build the feature slices and `encore::migrations` for their schema.

pub use encore_domain as domain;
pub use encore_kernel as kernel;

#[cfg(feature = "server")]
use encore_database::Migration;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use encore_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use encore_catalog as catalog;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "catalog",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init() -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![features::catalog::init()?];
    Ok(slices)
}

/// Schema migrations of every enabled feature, in application order.
#[cfg(feature = "server")]
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::catalog::migrations()
}

/// Routes contributed by feature slices.
#[cfg(feature = "server")]
#[must_use]
pub fn feature_router() -> encore_kernel::server::router::FeatureRouter {
    features::catalog::api::router()
}
