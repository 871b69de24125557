//! Начальные данные фермы: клетки, куры, работники и цена яйца.

use crate::repository::chicken_repository::{self, ChickenData};
use crate::repository::employee_repository::{self, EmployeeData};
use crate::repository::farm_repository::{self, EGG_PRICE_KEY};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;

/// Количество клеток на новой ферме.
const CAGE_COUNT: usize = 5;

/// Заполнить базу, если в ней ещё нет ни одной клетки.
/// Возвращает `true`, если данные были добавлены.
pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<bool, DbErr> {
    if farm_repository::count_cages(db).await? > 0 {
        return Ok(false);
    }

    info!("База пуста, добавляю начальные данные");
    let txn = db.begin().await?;

    let mut cage_ids = Vec::with_capacity(CAGE_COUNT);
    for number in 1..=CAGE_COUNT as i32 {
        let cage = farm_repository::create_cage(&txn, number).await?;
        cage_ids.push(cage.id);
    }

    let chickens = [
        (cage_ids[0], 2.5, 12, 25, "Леггорн"),
        (cage_ids[1], 3.0, 18, 22, "Род-Айленд"),
        (cage_ids[2], 2.8, 15, 28, "Нью-Гемпшир"),
    ];
    for (cage_id, weight, age, egg_per_month, breed) in chickens {
        chicken_repository::create(
            &txn,
            ChickenData {
                cage_id,
                weight,
                age,
                egg_per_month,
                breed: breed.to_string(),
            },
        )
        .await?;
    }

    let employees = [
        ("Иванов Иван Иванович", "1234 567890", 50000.0, &cage_ids[..2]),
        ("Петров Петр Петрович", "2345 678901", 45000.0, &cage_ids[2..]),
    ];
    for (full_name, passport_data, salary, cages) in employees {
        employee_repository::create(
            &txn,
            EmployeeData {
                full_name: full_name.to_string(),
                passport_data: passport_data.to_string(),
                salary,
                cages: cages.to_vec(),
            },
        )
        .await?;
    }

    farm_repository::set_config(&txn, EGG_PRICE_KEY, "10.0").await?;

    txn.commit().await?;
    info!("Начальные данные добавлены: {CAGE_COUNT} клеток, 3 курицы, 2 работника");
    Ok(true)
}
