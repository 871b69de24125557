//! Маршруты кур: CRUD и аналитика продуктивности.

use crate::api::AppState;
use crate::error::AppError;
use crate::repository::chicken_repository::ChickenData;
use crate::services::chicken_service;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use farm_entities::chickens::Model as Chicken;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AvgEggsQuery {
    pub weight: f64,
    pub age: i32,
}

/// Необязательный фильтр списка: только вместе `weight` и `age`.
#[derive(Debug, Default, Deserialize)]
pub struct ChickenFilter {
    pub weight: Option<f64>,
    pub age: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct AvgEggsResponse {
    pub weight: f64,
    pub age: i32,
    /// `null`, если кур с такими параметрами нет
    pub avg_eggs: Option<f64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chickens", get(list_chickens).post(create_chicken))
        .route("/chickens/low-productivity", get(low_productivity))
        .route("/chickens/most-productive", get(most_productive))
        .route("/chickens/avg-eggs", get(avg_eggs))
        .route(
            "/chickens/{id}",
            get(get_chicken).put(update_chicken).delete(delete_chicken),
        )
}

/// GET /api/chickens[?weight=&age=]
async fn list_chickens(
    State(state): State<AppState>,
    query: Result<Query<ChickenFilter>, QueryRejection>,
) -> Result<Json<Vec<Chicken>>, AppError> {
    let Query(filter) = query?;

    let chickens = match (filter.weight, filter.age) {
        (Some(weight), Some(age)) => {
            chicken_service::chickens_by_weight_and_age(&state.db, weight, age).await?
        }
        (None, None) => chicken_service::list_chickens(&state.db).await?,
        _ => {
            return Err(AppError::BadRequest(
                "weight и age передаются только вместе".into(),
            ))
        }
    };

    Ok(Json(chickens))
}

/// GET /api/chickens/{id}
async fn get_chicken(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Chicken>, AppError> {
    let Path(id) = path?;
    Ok(Json(chicken_service::get_chicken(&state.db, id).await?))
}

/// POST /api/chickens: заселить курицу в свободную клетку.
async fn create_chicken(
    State(state): State<AppState>,
    payload: Result<Json<ChickenData>, JsonRejection>,
) -> Result<(StatusCode, Json<Chicken>), AppError> {
    let Json(data) = payload?;
    let chicken = chicken_service::create_chicken(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(chicken)))
}

/// PUT /api/chickens/{id}: полная перезапись.
async fn update_chicken(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ChickenData>, JsonRejection>,
) -> Result<Json<Chicken>, AppError> {
    let Path(id) = path?;
    let Json(data) = payload?;
    Ok(Json(chicken_service::update_chicken(&state.db, id, data).await?))
}

/// DELETE /api/chickens/{id}
async fn delete_chicken(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = path?;
    chicken_service::delete_chicken(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "курица удалена" })))
}

/// GET /api/chickens/low-productivity: куры ниже среднего по поголовью.
async fn low_productivity(State(state): State<AppState>) -> Result<Json<Vec<Chicken>>, AppError> {
    Ok(Json(
        chicken_service::low_productivity_chickens(&state.db).await?,
    ))
}

/// GET /api/chickens/most-productive
async fn most_productive(State(state): State<AppState>) -> Result<Json<Chicken>, AppError> {
    Ok(Json(
        chicken_service::most_productive_chicken(&state.db).await?,
    ))
}

/// GET /api/chickens/avg-eggs?weight=&age=
async fn avg_eggs(
    State(state): State<AppState>,
    query: Result<Query<AvgEggsQuery>, QueryRejection>,
) -> Result<Json<AvgEggsResponse>, AppError> {
    let Query(AvgEggsQuery { weight, age }) = query?;
    let avg_eggs = chicken_service::avg_eggs_by_weight_and_age(&state.db, weight, age).await?;

    Ok(Json(AvgEggsResponse {
        weight,
        age,
        avg_eggs,
    }))
}
