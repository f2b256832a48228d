use super::dto::AdminRecord;
use super::{record_id, service};
use crate::admin::query::{ChangeList, ChangeListQuery};
use crate::admin::{ModelAdmin, ModelSummary};
use crate::error::CatalogError;
use crate::models::{
    Accessory, Category, InstrumentType, InsuranceOption, Model, Product, SubscriptionPlan,
};
use crate::repository::Stored;
use crate::service::{CatalogService, ListEdit};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use encore_derive::api_handler;
use encore_domain::constants::{
    ACCESSORY_TABLE, ADMIN_TAG, CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE, INSURANCE_OPTION_TABLE,
    PRODUCT_TABLE, SUBSCRIPTION_PLAN_TABLE,
};
use encore_kernel::prelude::{ApiError, ApiState, ErrorBody};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Runs `$body` with `$ty` bound to the model type registered under `$model`.
macro_rules! dispatch {
    ($model:expr, $ty:ident => $body:expr) => {
        match $model {
            CATEGORY_TABLE => {
                type $ty = Category;
                $body
            },
            INSTRUMENT_TYPE_TABLE => {
                type $ty = InstrumentType;
                $body
            },
            PRODUCT_TABLE => {
                type $ty = Product;
                $body
            },
            ACCESSORY_TABLE => {
                type $ty = Accessory;
                $body
            },
            SUBSCRIPTION_PLAN_TABLE => {
                type $ty = SubscriptionPlan;
                $body
            },
            INSURANCE_OPTION_TABLE => {
                type $ty = InsuranceOption;
                $body
            },
            other => {
                Err(CatalogError::UnknownModel { message: other.to_owned().into(), context: None })
            },
        }
    };
}

fn records<E: Model>(items: &[E]) -> Result<Vec<AdminRecord>, CatalogError> {
    items.iter().map(AdminRecord::from_model).collect()
}

async fn create<E: Stored>(
    service: &CatalogService<'_>,
    payload: Value,
) -> Result<AdminRecord, CatalogError> {
    AdminRecord::from_model(&service.create::<E>(payload).await?)
}

async fn fetch<E: Stored>(
    service: &CatalogService<'_>,
    id: &str,
) -> Result<AdminRecord, CatalogError> {
    AdminRecord::from_model(&service.get::<E>(id).await?)
}

async fn replace<E: Stored>(
    service: &CatalogService<'_>,
    id: &str,
    payload: Value,
) -> Result<AdminRecord, CatalogError> {
    AdminRecord::from_model(&service.replace::<E>(id, payload).await?)
}

async fn edit<E: Stored>(
    service: &CatalogService<'_>,
    edits: Vec<ListEdit>,
) -> Result<Vec<AdminRecord>, CatalogError> {
    records(&service.bulk_edit::<E>(edits).await?)
}

async fn children<C: Stored>(
    service: &CatalogService<'_>,
    parent: &ModelAdmin,
    parent_id: &str,
) -> Result<Vec<AdminRecord>, CatalogError> {
    records(&service.inline_children::<C>(parent, parent_id).await?)
}

async fn add_child<C: Stored>(
    service: &CatalogService<'_>,
    parent: &ModelAdmin,
    parent_id: &str,
    fields: Map<String, Value>,
) -> Result<AdminRecord, CatalogError> {
    AdminRecord::from_model(&service.inline_create::<C>(parent, parent_id, fields).await?)
}

#[api_handler(
    get,
    path = "/api/admin",
    responses((status = OK, description = "Registered models in registration order", body = [ModelSummary])),
    tag = ADMIN_TAG,
)]
pub(super) async fn list_models(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ModelSummary>>, ApiError> {
    Ok(Json(service(&state)?.site().summaries()))
}

#[api_handler(
    get,
    path = "/api/admin/{model}/schema",
    params(("model" = String, Path, description = "Model key")),
    responses(
        (status = OK, description = "Admin configuration of the model", body = ModelAdmin),
        (status = NOT_FOUND, description = "Unknown model", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn model_schema(
    State(state): State<ApiState>,
    Path(model): Path<String>,
) -> Result<Json<ModelAdmin>, ApiError> {
    Ok(Json(service(&state)?.site().get(&model)?.clone()))
}

#[api_handler(
    get,
    path = "/api/admin/{model}",
    params(
        ("model" = String, Path, description = "Model key"),
        ("q" = Option<String>, Query, description = "Search text, every term must match a search field"),
        ("page" = Option<usize>, Query, description = "1-based page number"),
        ("per_page" = Option<usize>, Query, description = "Rows per page (max 500)"),
    ),
    responses(
        (status = OK, description = "A page of the change list; other query keys filter by list_filter fields", body = ChangeList),
        (status = NOT_FOUND, description = "Unknown model", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid filter or paging", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn change_list(
    State(state): State<ApiState>,
    Path(model): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<ChangeList>, ApiError> {
    let service = service(&state)?;
    let query = ChangeListQuery::from_params(params)?;
    let list = dispatch!(model.as_str(), M => service.change_list::<M>(&query).await)?;
    Ok(Json(list))
}

#[api_handler(
    post,
    path = "/api/admin/{model}",
    params(("model" = String, Path, description = "Model key")),
    request_body = AdminRecord,
    responses(
        (status = CREATED, description = "Record created", body = AdminRecord),
        (status = BAD_REQUEST, description = "Malformed payload", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown model", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Field errors", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn create_record(
    State(state): State<ApiState>,
    Path(model): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<AdminRecord>), ApiError> {
    let service = service(&state)?;
    let record = dispatch!(model.as_str(), M => create::<M>(&service, payload).await)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[api_handler(
    patch,
    path = "/api/admin/{model}",
    params(("model" = String, Path, description = "Model key")),
    request_body = [ListEdit],
    responses(
        (status = OK, description = "Every edited record", body = [AdminRecord]),
        (status = NOT_FOUND, description = "Unknown model or record", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Non-editable fields or field errors; nothing was saved", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn bulk_edit(
    State(state): State<ApiState>,
    Path(model): Path<String>,
    Json(edits): Json<Vec<ListEdit>>,
) -> Result<Json<Vec<AdminRecord>>, ApiError> {
    let service = service(&state)?;
    let edits = edits
        .into_iter()
        .map(|edit| Ok(ListEdit { id: record_id(&edit.id, &model)?, changes: edit.changes }))
        .collect::<Result<Vec<_>, ApiError>>()?;

    let saved = dispatch!(model.as_str(), M => edit::<M>(&service, edits).await)?;
    Ok(Json(saved))
}

#[api_handler(
    get,
    path = "/api/admin/{model}/{id}",
    params(
        ("model" = String, Path, description = "Model key"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = OK, description = "The record", body = AdminRecord),
        (status = NOT_FOUND, description = "Unknown model or record", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn get_record(
    State(state): State<ApiState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<Json<AdminRecord>, ApiError> {
    let service = service(&state)?;
    let id = record_id(&id, &model)?;
    let record = dispatch!(model.as_str(), M => fetch::<M>(&service, &id).await)?;
    Ok(Json(record))
}

#[api_handler(
    put,
    path = "/api/admin/{model}/{id}",
    params(
        ("model" = String, Path, description = "Model key"),
        ("id" = String, Path, description = "Record id"),
    ),
    request_body = AdminRecord,
    responses(
        (status = OK, description = "The stored record", body = AdminRecord),
        (status = BAD_REQUEST, description = "Malformed payload", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown model or record", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Field errors", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn update_record(
    State(state): State<ApiState>,
    Path((model, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<AdminRecord>, ApiError> {
    let service = service(&state)?;
    let id = record_id(&id, &model)?;
    let record = dispatch!(model.as_str(), M => replace::<M>(&service, &id, payload).await)?;
    Ok(Json(record))
}

#[api_handler(
    delete,
    path = "/api/admin/{model}/{id}",
    params(
        ("model" = String, Path, description = "Model key"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = NO_CONTENT, description = "Deleted; dependent records cascaded or unlinked"),
        (status = NOT_FOUND, description = "Unknown model or record", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn delete_record(
    State(state): State<ApiState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let service = service(&state)?;
    let id = record_id(&id, &model)?;
    dispatch!(model.as_str(), M => service.delete::<M>(&id).await)?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/api/admin/{model}/{id}/inlines/{inline}",
    params(
        ("model" = String, Path, description = "Parent model key"),
        ("id" = String, Path, description = "Parent record id"),
        ("inline" = String, Path, description = "Inline model key"),
    ),
    responses(
        (status = OK, description = "Child records of the parent", body = [AdminRecord]),
        (status = NOT_FOUND, description = "Unknown model, inline or parent", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn inline_list(
    State(state): State<ApiState>,
    Path((model, id, inline)): Path<(String, String, String)>,
) -> Result<Json<Vec<AdminRecord>>, ApiError> {
    let service = service(&state)?;
    let parent = service.site().get(&model)?;
    let id = record_id(&id, &model)?;
    let rows = dispatch!(inline.as_str(), C => children::<C>(&service, parent, &id).await)?;
    Ok(Json(rows))
}

#[api_handler(
    post,
    path = "/api/admin/{model}/{id}/inlines/{inline}",
    params(
        ("model" = String, Path, description = "Parent model key"),
        ("id" = String, Path, description = "Parent record id"),
        ("inline" = String, Path, description = "Inline model key"),
    ),
    request_body = AdminRecord,
    responses(
        (status = CREATED, description = "Child record created under the parent", body = AdminRecord),
        (status = NOT_FOUND, description = "Unknown model, inline or parent", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Fields outside the inline form or field errors", body = ErrorBody),
    ),
    tag = ADMIN_TAG,
)]
pub(super) async fn inline_create(
    State(state): State<ApiState>,
    Path((model, id, inline)): Path<(String, String, String)>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<AdminRecord>), ApiError> {
    let service = service(&state)?;
    let parent = service.site().get(&model)?;
    let id = record_id(&id, &model)?;
    let record =
        dispatch!(inline.as_str(), C => add_child::<C>(&service, parent, &id, fields).await)?;
    Ok((StatusCode::CREATED, Json(record)))
}
