//! HTTP API: маршрутизация и состояние приложения.

pub mod chicken_routes;
pub mod employee_routes;
pub mod farm_routes;
pub mod report_routes;

use crate::error::AppError;
use crate::repository::DateRange;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Общее состояние приложения.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// Построить маршрутизатор Axum.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health_check))
        .merge(chicken_routes::routes())
        .merge(employee_routes::routes())
        .merge(report_routes::routes())
        .merge(farm_routes::routes());

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health: проверка работоспособности сервера.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_ok = state.db.execute_unprepared("SELECT 1").await.is_ok();
    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "error" },
        "database": db_ok,
        "service": "farm-server"
    }))
}

/// Параметры `start_date` / `end_date` отчётных запросов.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    /// Обе даты обязательны и не должны быть пустыми.
    pub fn require(self) -> Result<DateRange, AppError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Ok(DateRange::new(start, end))
            }
            _ => Err(AppError::BadRequest(
                "start_date и end_date обязательны".into(),
            )),
        }
    }
}
