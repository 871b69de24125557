//! Маршруты фермы: клетки, журнал яйценоскости, параметры.

use crate::api::AppState;
use crate::error::AppError;
use crate::repository::farm_repository::FarmRecordData;
use crate::repository::DateRange;
use crate::services::{chicken_service, farm_service};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use farm_entities::{cages, config_params, farm_records};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateCageRequest {
    pub number: i32,
}

/// Фильтр журнала: по курице либо по периоду.
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub chicken_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigValueRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigValueResponse {
    pub key: String,
    pub value: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cages", get(list_cages).post(create_cage))
        .route("/cages/empty", get(empty_cages))
        .route("/cages/most-eggs", get(cage_with_most_eggs))
        .route("/cages/{id}", get(get_cage))
        .route("/farm-records", get(list_records).post(create_record))
        .route(
            "/farm-records/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/config/{key}", get(get_config).put(set_config))
}

// ── Клетки ───────────────────────────────────────────────────────────────────

/// GET /api/cages
async fn list_cages(State(state): State<AppState>) -> Result<Json<Vec<cages::Model>>, AppError> {
    Ok(Json(farm_service::list_cages(&state.db).await?))
}

/// POST /api/cages
async fn create_cage(
    State(state): State<AppState>,
    payload: Result<Json<CreateCageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<cages::Model>), AppError> {
    let Json(req) = payload?;
    let cage = farm_service::create_cage(&state.db, req.number).await?;
    Ok((StatusCode::CREATED, Json(cage)))
}

/// GET /api/cages/{id}
async fn get_cage(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<cages::Model>, AppError> {
    let Path(id) = path?;
    Ok(Json(farm_service::get_cage(&state.db, id).await?))
}

/// GET /api/cages/empty: клетки без кур.
async fn empty_cages(State(state): State<AppState>) -> Result<Json<Vec<cages::Model>>, AppError> {
    Ok(Json(farm_service::empty_cages(&state.db).await?))
}

/// GET /api/cages/most-eggs: клетка-рекордсмен по яйцам.
async fn cage_with_most_eggs(
    State(state): State<AppState>,
) -> Result<Json<cages::Model>, AppError> {
    Ok(Json(chicken_service::cage_with_most_eggs(&state.db).await?))
}

// ── Журнал ───────────────────────────────────────────────────────────────────

/// GET /api/farm-records?chicken_id= | ?start_date=&end_date=
async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<Json<Vec<farm_records::Model>>, AppError> {
    let Query(query) = query?;

    let records = match (query.chicken_id, query.start_date, query.end_date) {
        (Some(chicken_id), _, _) => farm_service::records_for_chicken(&state.db, chicken_id).await?,
        (None, Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            farm_service::records_in_range(&state.db, &DateRange::new(start, end)).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "укажите chicken_id или start_date и end_date".into(),
            ))
        }
    };

    Ok(Json(records))
}

/// POST /api/farm-records
async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<FarmRecordData>, JsonRejection>,
) -> Result<(StatusCode, Json<farm_records::Model>), AppError> {
    let Json(data) = payload?;
    let record = farm_service::create_record(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/farm-records/{id}
async fn get_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<farm_records::Model>, AppError> {
    let Path(id) = path?;
    Ok(Json(farm_service::get_record(&state.db, id).await?))
}

/// PUT /api/farm-records/{id}
async fn update_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<FarmRecordData>, JsonRejection>,
) -> Result<Json<farm_records::Model>, AppError> {
    let Path(id) = path?;
    let Json(data) = payload?;
    Ok(Json(farm_service::update_record(&state.db, id, data).await?))
}

/// DELETE /api/farm-records/{id}
async fn delete_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = path?;
    farm_service::delete_record(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "запись удалена" })))
}

// ── Параметры ────────────────────────────────────────────────────────────────

/// GET /api/config/{key}
async fn get_config(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ConfigValueResponse>, AppError> {
    let Path(key) = path?;
    let value = farm_service::get_config(&state.db, &key).await?;
    Ok(Json(ConfigValueResponse { key, value }))
}

/// PUT /api/config/{key}: создать или перезаписать параметр.
async fn set_config(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ConfigValueRequest>, JsonRejection>,
) -> Result<Json<config_params::Model>, AppError> {
    let Path(key) = path?;
    let Json(req) = payload?;
    Ok(Json(
        farm_service::set_config(&state.db, &key, &req.value).await?,
    ))
}
