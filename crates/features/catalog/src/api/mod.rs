//! HTTP surface of the catalog: the generic admin API and the read-only storefront.

mod admin;
mod dto;
mod storefront;

pub use dto::{AccessoryView, AdminRecord, CategoryView, PlanView, ProductQuery, ProductView};

use crate::Catalog;
use crate::error::CatalogError;
use crate::service::CatalogService;
use encore_kernel::prelude::{ApiError, ApiState, ResourceGuard};
use encore_kernel::server::router::FeatureRouter;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Admin and storefront routes. Requires the [`Catalog`] slice in the state.
pub fn router() -> FeatureRouter {
    OpenApiRouter::new()
        .routes(routes!(admin::list_models))
        .routes(routes!(admin::model_schema))
        .routes(routes!(admin::change_list, admin::create_record, admin::bulk_edit))
        .routes(routes!(admin::get_record, admin::update_record, admin::delete_record))
        .routes(routes!(admin::inline_list, admin::inline_create))
        .routes(routes!(storefront::categories))
        .routes(routes!(storefront::products))
        .routes(routes!(storefront::product))
        .routes(routes!(storefront::accessories))
        .routes(routes!(storefront::plans))
        .routes(routes!(storefront::insurance))
}

fn service(state: &ApiState) -> Result<CatalogService<'_>, ApiError> {
    let catalog = state.try_get_slice::<Catalog>()?;
    Ok(CatalogService::new(&state.database, &catalog.site))
}

/// Normalizes a path id of `table` to its bare key.
fn record_id(id: &str, table: &str) -> Result<String, ApiError> {
    ResourceGuard::verify(id, table).map_err(|e| ApiError::bad_request(e.to_string()))
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation { errors, .. } => {
                Self::unprocessable("Validation failed", errors.into_inner())
            },
            CatalogError::NotFound { .. } | CatalogError::UnknownModel { .. } => {
                Self::not_found(err.to_string())
            },
            CatalogError::Serialization { .. } => Self::bad_request(err.to_string()),
            CatalogError::Database { .. } | CatalogError::Internal { .. } => Self::internal(&err),
        }
    }
}
