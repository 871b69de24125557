//! Маршруты работников: CRUD, клетки, куры и яйца по работнику.

use crate::api::{AppState, DateRangeQuery};
use crate::error::AppError;
use crate::repository::employee_repository::{Employee, EmployeeData};
use crate::services::{employee_service, report_service};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct ChickenCountResponse {
    pub employee_id: i32,
    pub chicken_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ChickenCountsResponse {
    pub counts: BTreeMap<i32, u64>,
}

#[derive(Debug, Serialize)]
pub struct EggCountResponse {
    pub employee_id: i32,
    pub start_date: String,
    pub end_date: String,
    pub egg_count: u64,
}

#[derive(Debug, Serialize)]
pub struct EggCountsResponse {
    pub start_date: String,
    pub end_date: String,
    pub counts: BTreeMap<i32, u64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/chicken-counts", get(all_chicken_counts))
        .route("/employees/egg-counts", get(all_egg_counts))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/chicken-count", get(chicken_count))
        .route("/employees/{id}/egg-count", get(egg_count))
}

/// GET /api/employees
async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(employee_service::list_employees(&state.db).await?))
}

/// GET /api/employees/{id}
async fn get_employee(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Employee>, AppError> {
    let Path(id) = path?;
    Ok(Json(employee_service::get_employee(&state.db, id).await?))
}

/// POST /api/employees: добавить работника вместе с клетками.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeData>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let Json(data) = payload?;
    let employee = employee_service::create_employee(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/employees/{id}: полная перезапись, включая набор клеток.
async fn update_employee(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<EmployeeData>, JsonRejection>,
) -> Result<Json<Employee>, AppError> {
    let Path(id) = path?;
    let Json(data) = payload?;
    Ok(Json(
        employee_service::update_employee(&state.db, id, data).await?,
    ))
}

/// DELETE /api/employees/{id}
async fn delete_employee(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = path?;
    employee_service::delete_employee(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "работник удалён" })))
}

/// GET /api/employees/{id}/chicken-count
async fn chicken_count(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ChickenCountResponse>, AppError> {
    let Path(employee_id) = path?;
    let chicken_count = employee_service::employee_chicken_count(&state.db, employee_id).await?;

    Ok(Json(ChickenCountResponse {
        employee_id,
        chicken_count,
    }))
}

/// GET /api/employees/chicken-counts: все работники, включая тех, у кого кур нет.
async fn all_chicken_counts(
    State(state): State<AppState>,
) -> Result<Json<ChickenCountsResponse>, AppError> {
    let counts = report_service::chicken_counts_by_employee(&state.db).await?;
    Ok(Json(ChickenCountsResponse { counts }))
}

/// GET /api/employees/{id}/egg-count?start_date=&end_date=
async fn egg_count(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<EggCountResponse>, AppError> {
    let Path(employee_id) = path?;
    let Query(query) = query?;
    let range = query.require()?;

    let egg_count = employee_service::employee_egg_count(&state.db, employee_id, &range).await?;

    Ok(Json(EggCountResponse {
        employee_id,
        start_date: range.start_date,
        end_date: range.end_date,
        egg_count,
    }))
}

/// GET /api/employees/egg-counts?start_date=&end_date=
async fn all_egg_counts(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<EggCountsResponse>, AppError> {
    let Query(query) = query?;
    let range = query.require()?;

    let counts = report_service::egg_counts_by_employee(&state.db, &range).await?;

    Ok(Json(EggCountsResponse {
        start_date: range.start_date,
        end_date: range.end_date,
        counts,
    }))
}
