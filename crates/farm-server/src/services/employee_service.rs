//! Сервис работников: закрепление клеток и показатели по работнику.

use super::ensure_cage_exists;
use crate::error::AppError;
use crate::repository::employee_repository::{self, Employee, EmployeeData};
use crate::repository::DateRange;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use std::collections::BTreeMap;

/// Добавить работника. Все его клетки должны существовать.
///
/// Одну клетку могут обслуживать несколько работников.
pub async fn create_employee(
    db: &DatabaseConnection,
    data: EmployeeData,
) -> Result<Employee, AppError> {
    let txn = db.begin().await?;

    ensure_cages_exist(&txn, &data.cages).await?;
    let employee = employee_repository::create(&txn, data).await?;
    txn.commit().await?;

    tracing::info!(
        "Работник {} добавлен, клетки: {:?}",
        employee.id,
        employee.cages
    );
    Ok(employee)
}

/// Перезаписать работника и весь набор его клеток.
pub async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    data: EmployeeData,
) -> Result<Employee, AppError> {
    let txn = db.begin().await?;

    ensure_employee_exists(&txn, id).await?;
    ensure_cages_exist(&txn, &data.cages).await?;
    let employee = employee_repository::update(&txn, id, data).await?;
    txn.commit().await?;

    tracing::info!("Работник {id} обновлён, клетки: {:?}", employee.cages);
    Ok(employee)
}

pub async fn delete_employee(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    ensure_employee_exists(db, id).await?;

    employee_repository::delete(db, id).await?;
    tracing::info!("Работник {id} удалён");
    Ok(())
}

pub async fn get_employee(db: &DatabaseConnection, id: i32) -> Result<Employee, AppError> {
    ensure_employee_exists(db, id).await
}

pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<Employee>, AppError> {
    Ok(employee_repository::find_all(db).await?)
}

pub async fn employee_chicken_count(db: &DatabaseConnection, id: i32) -> Result<u64, AppError> {
    ensure_employee_exists(db, id).await?;
    Ok(employee_repository::chicken_count(db, id).await?)
}

pub async fn employee_egg_count(
    db: &DatabaseConnection,
    id: i32,
    range: &DateRange,
) -> Result<u64, AppError> {
    ensure_employee_exists(db, id).await?;
    Ok(employee_repository::egg_count(db, id, range).await?)
}

/// Количество кур по работникам, только для тех, у кого они есть.
pub async fn all_employee_chicken_counts(
    db: &DatabaseConnection,
) -> Result<BTreeMap<i32, u64>, AppError> {
    Ok(employee_repository::all_chicken_counts(db).await?)
}

/// Количество яиц за период по работникам, только для тех, у кого они есть.
pub async fn all_employee_egg_counts(
    db: &DatabaseConnection,
    range: &DateRange,
) -> Result<BTreeMap<i32, u64>, AppError> {
    Ok(employee_repository::all_egg_counts(db, range).await?)
}

async fn ensure_employee_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<Employee, AppError> {
    employee_repository::find_by_id(db, id)
        .await?
        .ok_or(AppError::EmployeeNotFound(id))
}

async fn ensure_cages_exist<C: ConnectionTrait>(db: &C, cages: &[i32]) -> Result<(), AppError> {
    for &cage_id in cages {
        ensure_cage_exists(db, cage_id).await?;
    }
    Ok(())
}
