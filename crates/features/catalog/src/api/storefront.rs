use super::dto::{AccessoryView, CategoryView, PlanView, ProductQuery, ProductView};
use super::{record_id, service};
use crate::models::InsuranceOption;
use crate::service::ProductFilter;
use axum::Json;
use axum::extract::{Path, Query, State};
use encore_derive::api_handler;
use encore_domain::constants::{
    CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE, PRODUCT_TABLE, STOREFRONT_TAG,
};
use encore_kernel::prelude::{ApiError, ApiState, ErrorBody};

#[api_handler(
    get,
    path = "/api/catalog/categories",
    responses((status = OK, description = "Active categories with their active instrument types", body = [CategoryView])),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn categories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<CategoryView>>, ApiError> {
    let tree = service(&state)?.category_tree().await?;
    Ok(Json(tree.into_iter().map(CategoryView::from).collect()))
}

#[api_handler(
    get,
    path = "/api/catalog/products",
    params(ProductQuery),
    responses(
        (status = OK, description = "Active products", body = [ProductView]),
        (status = BAD_REQUEST, description = "Malformed filter id", body = ErrorBody),
    ),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn products(
    State(state): State<ApiState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let filter = ProductFilter {
        category: query.category.as_deref().map(|id| record_id(id, CATEGORY_TABLE)).transpose()?,
        instrument_type: query
            .instrument_type
            .as_deref()
            .map(|id| record_id(id, INSTRUMENT_TYPE_TABLE))
            .transpose()?,
    };

    let products = service(&state)?.products(&filter).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

#[api_handler(
    get,
    path = "/api/catalog/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = OK, description = "The product with its price labels", body = ProductView),
        (status = NOT_FOUND, description = "Unknown or inactive product", body = ErrorBody),
    ),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    let id = record_id(&id, PRODUCT_TABLE)?;
    let product = service(&state)?.product(&id).await?;
    Ok(Json(ProductView::from(product)))
}

#[api_handler(
    get,
    path = "/api/catalog/accessories",
    responses((status = OK, description = "Active accessories", body = [AccessoryView])),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn accessories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<AccessoryView>>, ApiError> {
    let accessories = service(&state)?.accessories().await?;
    Ok(Json(accessories.into_iter().map(AccessoryView::from).collect()))
}

#[api_handler(
    get,
    path = "/api/catalog/plans",
    responses((status = OK, description = "Active subscription plans by duration", body = [PlanView])),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn plans(State(state): State<ApiState>) -> Result<Json<Vec<PlanView>>, ApiError> {
    let plans = service(&state)?.plans().await?;
    Ok(Json(plans.into_iter().map(PlanView::from).collect()))
}

#[api_handler(
    get,
    path = "/api/catalog/insurance",
    responses((status = OK, description = "Active insurance options", body = [InsuranceOption])),
    tag = STOREFRONT_TAG,
)]
pub(super) async fn insurance(
    State(state): State<ApiState>,
) -> Result<Json<Vec<InsuranceOption>>, ApiError> {
    Ok(Json(service(&state)?.insurance_options().await?))
}
