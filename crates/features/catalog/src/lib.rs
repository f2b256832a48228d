//! Instrument catalog slice.
//!
//! Categories, instrument types, products, accessories, subscription plans and insurance options,
//! the admin registry describing how each model is managed, and (with the `server` feature) the
//! `SurrealDB` repository plus the admin and storefront HTTP routes.

pub mod admin;
#[cfg(feature = "server")]
pub mod api;
mod error;
pub mod models;
pub mod relations;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod service;

pub use crate::error::{CatalogError, CatalogErrorExt};

use crate::admin::AdminSite;
#[cfg(feature = "server")]
use encore_database::Migration;
use encore_kernel::domain::registry::InitializedSlice;

/// Slice name reported in diagnostics and migration records.
pub const SLICE_NAME: &str = "catalog";

/// Catalog feature state.
#[encore_derive::encore_slice]
pub struct Catalog {
    /// Admin registrations of every catalog model
    pub site: AdminSite,
}

/// Initializes the catalog slice with every model registered in the admin site.
///
/// # Errors
/// Returns an error if a registration refers to a model or inline that does not exist.
pub fn init() -> Result<InitializedSlice, CatalogError> {
    let site = AdminSite::catalog();
    for admin in site.models() {
        for inline in &admin.inlines {
            if site.find(&inline.model).is_none() {
                let message = format!("{} inline {} is not registered", admin.model, inline.model);
                return Err(message.into());
            }
        }
    }

    tracing::info!(models = site.models().count(), "Catalog slice initialized");
    Ok(InitializedSlice::new(SLICE_NAME, Catalog::new(CatalogInner { site })))
}

/// Schema migrations of the catalog tables, in application order.
#[cfg(feature = "server")]
#[must_use]
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(SLICE_NAME, "0001", include_str!("../migrations/0001_catalog.surql"))]
}
