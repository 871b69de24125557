//! Сервис кур: заселение в клетки, перевод между клетками, аналитика.

use super::ensure_cage_exists;
use crate::error::AppError;
use crate::repository::chicken_repository::{self, ChickenData};
use crate::repository::farm_repository;
use farm_entities::{cages, chickens::Model};
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Добавить курицу. Клетка должна существовать и быть свободной.
pub async fn create_chicken(db: &DatabaseConnection, data: ChickenData) -> Result<Model, AppError> {
    let txn = db.begin().await?;

    ensure_cage_exists(&txn, data.cage_id).await?;
    if chicken_repository::find_by_cage(&txn, data.cage_id)
        .await?
        .is_some()
    {
        return Err(AppError::CageOccupied(data.cage_id));
    }

    let chicken = chicken_repository::create(&txn, data).await?;
    txn.commit().await?;

    tracing::info!(
        "Курица {} заселена в клетку {}",
        chicken.id,
        chicken.cage_id
    );
    Ok(chicken)
}

/// Перезаписать курицу целиком.
///
/// При смене клетки новая клетка проверяется так же, как при создании, но
/// сама обновляемая курица занятостью не считается.
pub async fn update_chicken(
    db: &DatabaseConnection,
    id: i32,
    data: ChickenData,
) -> Result<Model, AppError> {
    let txn = db.begin().await?;

    let existing = chicken_repository::find_by_id(&txn, id)
        .await?
        .ok_or(AppError::ChickenNotFound(id))?;

    if existing.cage_id != data.cage_id {
        ensure_cage_exists(&txn, data.cage_id).await?;
        if let Some(occupant) = chicken_repository::find_by_cage(&txn, data.cage_id).await? {
            if occupant.id != id {
                return Err(AppError::CageOccupied(data.cage_id));
            }
        }
    }

    let chicken = chicken_repository::update(&txn, id, data).await?;
    txn.commit().await?;

    tracing::info!("Курица {id} обновлена");
    Ok(chicken)
}

pub async fn delete_chicken(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    if chicken_repository::find_by_id(db, id).await?.is_none() {
        return Err(AppError::ChickenNotFound(id));
    }

    chicken_repository::delete(db, id).await?;
    tracing::info!("Курица {id} удалена");
    Ok(())
}

pub async fn get_chicken(db: &DatabaseConnection, id: i32) -> Result<Model, AppError> {
    chicken_repository::find_by_id(db, id)
        .await?
        .ok_or(AppError::ChickenNotFound(id))
}

pub async fn list_chickens(db: &DatabaseConnection) -> Result<Vec<Model>, AppError> {
    Ok(chicken_repository::find_all(db).await?)
}

pub async fn chickens_by_weight_and_age(
    db: &DatabaseConnection,
    weight: f64,
    age: i32,
) -> Result<Vec<Model>, AppError> {
    Ok(chicken_repository::find_by_weight_and_age(db, weight, age).await?)
}

/// Среднее яиц в месяц для кур с точно таким весом и возрастом.
pub async fn avg_eggs_by_weight_and_age(
    db: &DatabaseConnection,
    weight: f64,
    age: i32,
) -> Result<Option<f64>, AppError> {
    Ok(chicken_repository::avg_eggs_by_weight_and_age(db, weight, age).await?)
}

pub async fn low_productivity_chickens(db: &DatabaseConnection) -> Result<Vec<Model>, AppError> {
    Ok(chicken_repository::find_low_productivity(db).await?)
}

pub async fn most_productive_chicken(db: &DatabaseConnection) -> Result<Model, AppError> {
    chicken_repository::find_most_productive(db)
        .await?
        .ok_or_else(|| AppError::NotFound("на ферме нет ни одной курицы".into()))
}

/// Клетка, в которой снесено больше всего яиц.
pub async fn cage_with_most_eggs(db: &DatabaseConnection) -> Result<cages::Model, AppError> {
    let cage_id = farm_repository::cage_with_most_eggs(db)
        .await?
        .ok_or_else(|| AppError::NotFound("нет ни одной записи о снесённом яйце".into()))?;

    ensure_cage_exists(db, cage_id).await
}
