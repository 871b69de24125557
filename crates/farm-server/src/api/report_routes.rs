//! Маршруты сводных отчётов.

use crate::api::{AppState, DateRangeQuery};
use crate::error::AppError;
use crate::services::report_service::{
    self, EmployeeChickenCountStats, EmployeeEggStats, MostProductiveChickenStats,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use farm_entities::chickens::Model as Chicken;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EggStatsResponse {
    pub start_date: String,
    pub end_date: String,
    pub total_eggs: u64,
    pub total_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct EmployeeEggStatsResponse {
    pub start_date: String,
    pub end_date: String,
    pub stats: Vec<EmployeeEggStats>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/egg-stats", get(egg_stats))
        .route("/reports/employee-egg-stats", get(employee_egg_stats))
        .route(
            "/reports/low-productivity-chickens",
            get(low_productivity_chickens),
        )
        .route(
            "/reports/most-productive-chicken",
            get(most_productive_chicken),
        )
        .route(
            "/reports/employee-chicken-counts",
            get(employee_chicken_counts),
        )
}

/// GET /api/reports/egg-stats: всего яиц за период и их стоимость.
async fn egg_stats(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<EggStatsResponse>, AppError> {
    let Query(query) = query?;
    let range = query.require()?;

    let stats = report_service::total_egg_stats(&state.db, &range).await?;

    Ok(Json(EggStatsResponse {
        start_date: range.start_date,
        end_date: range.end_date,
        total_eggs: stats.total_eggs,
        total_cost: stats.total_cost,
    }))
}

/// GET /api/reports/employee-egg-stats
async fn employee_egg_stats(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<EmployeeEggStatsResponse>, AppError> {
    let Query(query) = query?;
    let range = query.require()?;

    let stats = report_service::employee_egg_stats(&state.db, &range).await?;

    Ok(Json(EmployeeEggStatsResponse {
        start_date: range.start_date,
        end_date: range.end_date,
        stats,
    }))
}

/// GET /api/reports/low-productivity-chickens
async fn low_productivity_chickens(
    State(state): State<AppState>,
) -> Result<Json<Vec<Chicken>>, AppError> {
    Ok(Json(
        report_service::low_productivity_chickens(&state.db).await?,
    ))
}

/// GET /api/reports/most-productive-chicken
async fn most_productive_chicken(
    State(state): State<AppState>,
) -> Result<Json<MostProductiveChickenStats>, AppError> {
    Ok(Json(
        report_service::most_productive_chicken_stats(&state.db).await?,
    ))
}

/// GET /api/reports/employee-chicken-counts
async fn employee_chicken_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeChickenCountStats>>, AppError> {
    Ok(Json(
        report_service::employee_chicken_count_stats(&state.db).await?,
    ))
}
