//! Доменные сервисы: проверки правил фермы поверх слоя хранения.

pub mod chicken_service;
pub mod employee_service;
pub mod farm_service;
pub mod report_service;

use crate::error::AppError;
use crate::repository::farm_repository;
use farm_entities::cages;
use sea_orm::ConnectionTrait;

/// Найти клетку или вернуть [`AppError::CageNotFound`].
pub(crate) async fn ensure_cage_exists<C: ConnectionTrait>(
    db: &C,
    cage_id: i32,
) -> Result<cages::Model, AppError> {
    farm_repository::find_cage(db, cage_id)
        .await?
        .ok_or(AppError::CageNotFound(cage_id))
}
