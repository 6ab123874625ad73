//! Entity CRUD handlers: list, read, create, update, delete, and nested
//! booking creation. Handlers are generic; the entity is resolved from the
//! path segment and all per-entity behavior comes from the entity tables.

use crate::entity::Entity;
use crate::error::ApiError;
use crate::payload;
use crate::project::project;
use crate::reconcile::{alias_map_for, reconcile, resolve_columns};
use crate::schema::PkType;
use crate::service::{CrudService, Page};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn parse_id(id_str: &str, pk_type: &PkType) -> Result<Value, ApiError> {
    Ok(match pk_type {
        PkType::Uuid => {
            let u = uuid::Uuid::parse_str(id_str)
                .map_err(|_| ApiError::BadRequest("invalid uuid".into()))?;
            Value::String(u.to_string())
        }
        PkType::BigInt | PkType::Int => {
            let n: i64 = id_str
                .parse()
                .map_err(|_| ApiError::BadRequest("invalid id".into()))?;
            Value::Number(n.into())
        }
        PkType::Text => Value::String(id_str.to_string()),
    })
}

fn entity_for(segment: &str) -> Result<Entity, ApiError> {
    Entity::from_path(segment).ok_or_else(|| ApiError::UnknownResource(segment.to_string()))
}

/// Shape one row for the API: apply the entity's projection when it has one,
/// otherwise pass the row through minus hidden columns.
fn shape_row(entity: Entity, row: Value) -> Value {
    let mut map = match row {
        Value::Object(map) => map,
        other => return other,
    };
    if let Some(projection) = entity.projection() {
        return Value::Object(project(&map, projection));
    }
    for col in entity.hidden_columns() {
        map.remove(*col);
    }
    Value::Object(map)
}

#[utoipa::path(
    get,
    path = "/{segment}",
    tag = "entities",
    params(
        ("segment" = String, Path, description = "Entity collection, e.g. services"),
        ("skip" = Option<i64>, Query, description = "Rows to skip (services and bookings only)"),
        ("limit" = Option<i64>, Query, description = "Maximum rows (services and bookings only)")
    ),
    responses(
        (status = 200, description = "Rows in storage order"),
        (status = 404, description = "Unknown entity")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entity = entity_for(&segment)?;
    let table = state.catalog.describe(entity);
    let page = if entity.paginated() {
        Page::from_params(&params)
    } else {
        Page::unlimited()
    };
    let rows = CrudService::list(&state.pool, table, page).await?;
    let rows: Vec<Value> = rows.into_iter().map(|r| shape_row(entity, r)).collect();
    Ok(Json(Value::Array(rows)))
}

#[utoipa::path(
    get,
    path = "/{segment}/{id}",
    tag = "entities",
    params(
        ("segment" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Primary key")
    ),
    responses(
        (status = 200, description = "The row"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown entity or no such row")
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entity = entity_for(&segment)?;
    let table = state.catalog.describe(entity);
    let id = parse_id(&id_str, &table.pk_type)?;
    let row = CrudService::read(&state.pool, table, &id)
        .await?
        .ok_or(ApiError::NotFound(entity.label()))?;
    Ok((StatusCode::OK, Json(shape_row(entity, row))))
}

#[utoipa::path(
    post,
    path = "/{segment}",
    tag = "entities",
    params(("segment" = String, Path, description = "Entity collection")),
    responses(
        (status = 201, description = "Created row, generated columns included"),
        (status = 400, description = "Payload satisfies the shape but misses required columns"),
        (status = 405, description = "Bookings are created under their service"),
        (status = 422, description = "Shape or constraint violation")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entity = entity_for(&segment)?;
    if !entity.top_level_create() {
        return Err(ApiError::NotAllowed(format!(
            "{} are created under /services/{{service_id}}/{}",
            entity.path_segment(),
            entity.path_segment()
        )));
    }
    let table = state.catalog.describe(entity);
    let payload = payload::create_map(entity, body)?;
    let aliases = alias_map_for(entity, table);
    let write = reconcile(entity, table, &payload, &aliases)?;
    let row = CrudService::create(&state.pool, table, &write).await?;
    Ok((StatusCode::CREATED, Json(shape_row(entity, row))))
}

#[utoipa::path(
    post,
    path = "/services/{service_id}/bookings",
    tag = "entities",
    params(("service_id" = String, Path, description = "Parent service primary key")),
    responses(
        (status = 201, description = "Created booking tied to the service"),
        (status = 400, description = "Malformed id or missing required columns"),
        (status = 404, description = "No such service; nothing is persisted"),
        (status = 422, description = "Shape or constraint violation")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let services = state.catalog.describe(Entity::Service);
    let id = parse_id(&service_id, &services.pk_type)?;
    let bookings = state.catalog.describe(Entity::Booking);
    let mut payload = payload::create_map(Entity::Booking, body)?;

    CrudService::read(&state.pool, services, &id)
        .await?
        .ok_or(ApiError::NotFound(Entity::Service.label()))?;

    // The foreign key comes from the path, never from the payload; it must
    // be in place before the required-column check runs.
    if bookings.has_column("service_id") {
        payload.insert("service_id".to_string(), id.clone());
    }
    let aliases = alias_map_for(Entity::Booking, bookings);
    let write = reconcile(Entity::Booking, bookings, &payload, &aliases)?;
    let row = CrudService::create(&state.pool, bookings, &write).await?;
    Ok((StatusCode::CREATED, Json(shape_row(Entity::Booking, row))))
}

#[utoipa::path(
    put,
    path = "/{segment}/{id}",
    tag = "entities",
    params(
        ("segment" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Primary key")
    ),
    responses(
        (status = 200, description = "Updated row; omitted fields untouched"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown entity or no such row"),
        (status = 422, description = "Shape or constraint violation")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entity = entity_for(&segment)?;
    let table = state.catalog.describe(entity);
    let id = parse_id(&id_str, &table.pk_type)?;
    let payload = payload::update_map(entity, body)?;
    let aliases = alias_map_for(entity, table);
    let write = resolve_columns(table, &payload, &aliases);
    let row = CrudService::update(&state.pool, table, &id, &write)
        .await?
        .ok_or(ApiError::NotFound(entity.label()))?;
    Ok((StatusCode::OK, Json(shape_row(entity, row))))
}

#[utoipa::path(
    delete,
    path = "/{segment}/{id}",
    tag = "entities",
    params(
        ("segment" = String, Path, description = "Entity collection"),
        ("id" = String, Path, description = "Primary key")
    ),
    responses(
        (status = 204, description = "Row removed"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown entity or no such row")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entity = entity_for(&segment)?;
    let table = state.catalog.describe(entity);
    let id = parse_id(&id_str, &table.pk_type)?;
    CrudService::delete(&state.pool, table, &id)
        .await?
        .ok_or(ApiError::NotFound(entity.label()))?;
    Ok(StatusCode::NO_CONTENT)
}
