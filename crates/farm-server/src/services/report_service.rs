//! Сервис отчётов: сводные показатели по ферме.

use super::{chicken_service, employee_service};
use crate::error::AppError;
use crate::repository::employee_repository::Employee;
use crate::repository::{farm_repository, DateRange};
use farm_entities::chickens;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EggStats {
    pub total_eggs: u64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeEggStats {
    pub employee_id: i32,
    pub employee_name: String,
    pub egg_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostProductiveChickenStats {
    pub chicken_id: i32,
    pub cage_id: i32,
    pub cage_number: i32,
    pub egg_per_month: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeChickenCountStats {
    pub employee_id: i32,
    pub employee_name: String,
    pub chicken_count: u64,
}

/// Всего яиц за период и их стоимость.
pub async fn total_egg_stats(
    db: &DatabaseConnection,
    range: &DateRange,
) -> Result<EggStats, AppError> {
    let total_eggs = farm_repository::egg_count_by_date_range(db, range).await?;
    let total_cost = farm_repository::total_egg_cost(db, range).await?;

    Ok(EggStats {
        total_eggs,
        total_cost,
    })
}

/// Яйца за период по каждому работнику, включая тех, у кого их ноль.
pub async fn employee_egg_stats(
    db: &DatabaseConnection,
    range: &DateRange,
) -> Result<Vec<EmployeeEggStats>, AppError> {
    let counts = employee_service::all_employee_egg_counts(db, range).await?;
    let employees = employee_service::list_employees(db).await?;

    Ok(employees
        .into_iter()
        .map(|e| EmployeeEggStats {
            egg_count: count_or_zero(&counts, e.id),
            employee_id: e.id,
            employee_name: e.full_name,
        })
        .collect())
}

pub async fn low_productivity_chickens(
    db: &DatabaseConnection,
) -> Result<Vec<chickens::Model>, AppError> {
    chicken_service::low_productivity_chickens(db).await
}

/// Самая продуктивная курица вместе с номером её клетки.
pub async fn most_productive_chicken_stats(
    db: &DatabaseConnection,
) -> Result<MostProductiveChickenStats, AppError> {
    let chicken = chicken_service::most_productive_chicken(db).await?;
    let cage = super::ensure_cage_exists(db, chicken.cage_id).await?;

    Ok(MostProductiveChickenStats {
        chicken_id: chicken.id,
        cage_id: chicken.cage_id,
        cage_number: cage.number,
        egg_per_month: chicken.egg_per_month,
    })
}

/// Количество кур по каждому работнику, включая тех, у кого их ноль.
pub async fn employee_chicken_count_stats(
    db: &DatabaseConnection,
) -> Result<Vec<EmployeeChickenCountStats>, AppError> {
    let counts = employee_service::all_employee_chicken_counts(db).await?;
    let employees = employee_service::list_employees(db).await?;

    Ok(employees
        .into_iter()
        .map(|e| EmployeeChickenCountStats {
            chicken_count: count_or_zero(&counts, e.id),
            employee_id: e.id,
            employee_name: e.full_name,
        })
        .collect())
}

/// Кур по работникам с явными нулями.
pub async fn chicken_counts_by_employee(
    db: &DatabaseConnection,
) -> Result<BTreeMap<i32, u64>, AppError> {
    let counts = employee_service::all_employee_chicken_counts(db).await?;
    let employees = employee_service::list_employees(db).await?;
    Ok(backfill_zero(&counts, &employees))
}

/// Яиц за период по работникам с явными нулями.
pub async fn egg_counts_by_employee(
    db: &DatabaseConnection,
    range: &DateRange,
) -> Result<BTreeMap<i32, u64>, AppError> {
    let counts = employee_service::all_employee_egg_counts(db, range).await?;
    let employees = employee_service::list_employees(db).await?;
    Ok(backfill_zero(&counts, &employees))
}

/// Дополнить результат join-запроса нулями для работников, которых в нём нет.
pub fn backfill_zero(counts: &BTreeMap<i32, u64>, employees: &[Employee]) -> BTreeMap<i32, u64> {
    employees
        .iter()
        .map(|e| (e.id, count_or_zero(counts, e.id)))
        .collect()
}

/// Работник, которого нет в результате join-запроса, получает ноль.
fn count_or_zero(counts: &BTreeMap<i32, u64>, employee_id: i32) -> u64 {
    counts.get(&employee_id).copied().unwrap_or(0)
}
