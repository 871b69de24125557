//! Сервис фермы: клетки, журнал яйценоскости, параметры конфигурации.

use super::ensure_cage_exists;
use crate::error::AppError;
use crate::repository::farm_repository::{self, FarmRecordData};
use crate::repository::{chicken_repository, DateRange};
use farm_entities::{cages, config_params, farm_records};
use sea_orm::DatabaseConnection;

pub async fn list_cages(db: &DatabaseConnection) -> Result<Vec<cages::Model>, AppError> {
    Ok(farm_repository::find_all_cages(db).await?)
}

pub async fn get_cage(db: &DatabaseConnection, id: i32) -> Result<cages::Model, AppError> {
    ensure_cage_exists(db, id).await
}

pub async fn create_cage(db: &DatabaseConnection, number: i32) -> Result<cages::Model, AppError> {
    let cage = farm_repository::create_cage(db, number).await?;
    tracing::info!("Клетка {} добавлена (номер {number})", cage.id);
    Ok(cage)
}

pub async fn empty_cages(db: &DatabaseConnection) -> Result<Vec<cages::Model>, AppError> {
    Ok(farm_repository::find_empty_cages(db).await?)
}

/// Записать наблюдение. Клетка и курица должны существовать.
pub async fn create_record(
    db: &DatabaseConnection,
    data: FarmRecordData,
) -> Result<farm_records::Model, AppError> {
    ensure_record_refs(db, &data).await?;

    let record = farm_repository::create_record(db, data).await?;
    tracing::debug!(
        "Запись журнала {}: клетка {}, {}",
        record.id,
        record.cage_id,
        record.date
    );
    Ok(record)
}

pub async fn get_record(
    db: &DatabaseConnection,
    id: i32,
) -> Result<farm_records::Model, AppError> {
    farm_repository::find_record(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("запись журнала {id}")))
}

pub async fn records_in_range(
    db: &DatabaseConnection,
    range: &DateRange,
) -> Result<Vec<farm_records::Model>, AppError> {
    Ok(farm_repository::find_records_by_date_range(db, range).await?)
}

pub async fn records_for_chicken(
    db: &DatabaseConnection,
    chicken_id: i32,
) -> Result<Vec<farm_records::Model>, AppError> {
    Ok(farm_repository::find_records_by_chicken(db, chicken_id).await?)
}

/// Перезаписать наблюдение целиком.
pub async fn update_record(
    db: &DatabaseConnection,
    id: i32,
    data: FarmRecordData,
) -> Result<farm_records::Model, AppError> {
    get_record(db, id).await?;
    ensure_record_refs(db, &data).await?;

    Ok(farm_repository::update_record(db, id, data).await?)
}

pub async fn delete_record(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    get_record(db, id).await?;
    farm_repository::delete_record(db, id).await?;
    Ok(())
}

pub async fn get_config(db: &DatabaseConnection, key: &str) -> Result<String, AppError> {
    farm_repository::get_config(db, key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("параметр {key}")))
}

pub async fn set_config(
    db: &DatabaseConnection,
    key: &str,
    value: &str,
) -> Result<config_params::Model, AppError> {
    let param = farm_repository::set_config(db, key, value).await?;
    tracing::info!("Параметр {key} = {value}");
    Ok(param)
}

async fn ensure_record_refs(
    db: &DatabaseConnection,
    data: &FarmRecordData,
) -> Result<(), AppError> {
    ensure_cage_exists(db, data.cage_id).await?;
    if chicken_repository::find_by_id(db, data.chicken_id)
        .await?
        .is_none()
    {
        return Err(AppError::ChickenNotFound(data.chicken_id));
    }
    Ok(())
}
