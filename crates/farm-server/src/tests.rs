//! Тесты: правила заселения кур, клетки работников, отчёты, интеграционные тесты HTTP.

use crate::error::AppError;
use crate::repository::chicken_repository::{self, ChickenData};
use crate::repository::employee_repository::{self, EmployeeData};
use crate::repository::farm_repository::{self, FarmRecordData, DEFAULT_EGG_PRICE, EGG_PRICE_KEY};
use crate::repository::DateRange;
use crate::services::{chicken_service, employee_service, farm_service, report_service};
use farm_migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

// ── Фикстуры ─────────────────────────────────────────────────────────────────

async fn setup_db() -> DatabaseConnection {
    let db: DatabaseConnection = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn chicken(cage_id: i32, weight: f64, age: i32, egg_per_month: i32, breed: &str) -> ChickenData {
    ChickenData {
        cage_id,
        weight,
        age,
        egg_per_month,
        breed: breed.to_string(),
    }
}

fn employee(full_name: &str, passport_data: &str, cages: Vec<i32>) -> EmployeeData {
    EmployeeData {
        full_name: full_name.to_string(),
        passport_data: passport_data.to_string(),
        salary: 40000.0,
        cages,
    }
}

fn record(date: &str, cage_id: i32, chicken_id: i32, has_egg: bool) -> FarmRecordData {
    FarmRecordData {
        date: date.to_string(),
        cage_id,
        chicken_id,
        has_egg,
    }
}

/// 3 клетки; куры в клетках 1 (25 яиц) и 2 (22 яйца);
/// работник 1 обслуживает клетку 1, работник 2 обслуживает клетку 2.
async fn seed_fixture(db: &DatabaseConnection) {
    for number in 1..=3 {
        farm_repository::create_cage(db, number).await.unwrap();
    }
    chicken_repository::create(db, chicken(1, 2.5, 12, 25, "Леггорн"))
        .await
        .unwrap();
    chicken_repository::create(db, chicken(2, 3.0, 18, 22, "Род-Айленд"))
        .await
        .unwrap();
    employee_repository::create(db, employee("Иванов Иван Иванович", "1234 567890", vec![1]))
        .await
        .unwrap();
    employee_repository::create(db, employee("Петров Петр Петрович", "2345 678901", vec![2]))
        .await
        .unwrap();
}

async fn fixture_db() -> DatabaseConnection {
    let db = setup_db().await;
    seed_fixture(&db).await;
    db
}

fn sorted(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids
}

// ── Куры ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_chicken_in_missing_cage_fails() {
    let db = fixture_db().await;

    let err = chicken_service::create_chicken(&db, chicken(999, 2.0, 10, 20, "Брама"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CageNotFound(999)), "{err:?}");
    assert_eq!(chicken_service::list_chickens(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_chicken_in_occupied_cage_fails() {
    let db = fixture_db().await;
    let occupant = chicken_service::get_chicken(&db, 1).await.unwrap();

    let err = chicken_service::create_chicken(&db, chicken(1, 2.0, 10, 30, "Брама"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CageOccupied(1)), "{err:?}");
    assert_eq!(chicken_service::get_chicken(&db, 1).await.unwrap(), occupant);
    assert_eq!(chicken_service::list_chickens(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_chicken_in_free_cage() {
    let db = fixture_db().await;

    let created = chicken_service::create_chicken(&db, chicken(3, 2.8, 15, 28, "Нью-Гемпшир"))
        .await
        .unwrap();

    assert_eq!(created.cage_id, 3);
    assert_eq!(created.breed, "Нью-Гемпшир");
    assert_eq!(
        chicken_service::get_chicken(&db, created.id).await.unwrap(),
        created
    );
}

#[tokio::test]
async fn test_update_chicken_into_cage_of_other_chicken_fails() {
    let db = fixture_db().await;

    let err = chicken_service::update_chicken(&db, 1, chicken(2, 2.5, 12, 25, "Леггорн"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CageOccupied(2)), "{err:?}");
    assert_eq!(chicken_service::get_chicken(&db, 1).await.unwrap().cage_id, 1);
}

#[tokio::test]
async fn test_update_chicken_in_own_cage_succeeds() {
    let db = fixture_db().await;

    let updated = chicken_service::update_chicken(&db, 1, chicken(1, 2.7, 13, 26, "Леггорн"))
        .await
        .unwrap();

    assert_eq!(updated.id, 1);
    assert_eq!(updated.cage_id, 1);
    assert_eq!(updated.weight, 2.7);
    assert_eq!(updated.egg_per_month, 26);
}

#[tokio::test]
async fn test_update_chicken_is_full_overwrite() {
    let db = fixture_db().await;

    let updated = chicken_service::update_chicken(
        &db,
        2,
        ChickenData {
            cage_id: 3,
            egg_per_month: 22,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.cage_id, 3);
    assert_eq!(updated.breed, "");
    assert_eq!(updated.weight, 0.0);
    assert_eq!(updated.age, 0);
}

#[tokio::test]
async fn test_update_chicken_into_missing_cage_fails() {
    let db = fixture_db().await;

    let err = chicken_service::update_chicken(&db, 1, chicken(42, 2.5, 12, 25, "Леггорн"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CageNotFound(42)), "{err:?}");
}

#[tokio::test]
async fn test_update_missing_chicken_fails() {
    let db = fixture_db().await;

    let err = chicken_service::update_chicken(&db, 77, chicken(3, 2.5, 12, 25, "Леггорн"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ChickenNotFound(77)), "{err:?}");
}

#[tokio::test]
async fn test_delete_chicken_then_get_is_not_found() {
    let db = fixture_db().await;

    chicken_service::delete_chicken(&db, 2).await.unwrap();

    let err = chicken_service::get_chicken(&db, 2).await.unwrap_err();
    assert!(matches!(err, AppError::ChickenNotFound(2)), "{err:?}");

    let err = chicken_service::delete_chicken(&db, 2).await.unwrap_err();
    assert!(matches!(err, AppError::ChickenNotFound(2)), "{err:?}");
}

#[tokio::test]
async fn test_avg_eggs_is_exact_match_mean() {
    let db = fixture_db().await;
    chicken_service::create_chicken(&db, chicken(3, 2.5, 12, 20, "Брама"))
        .await
        .unwrap();

    let avg = chicken_service::avg_eggs_by_weight_and_age(&db, 2.5, 12)
        .await
        .unwrap();
    assert_eq!(avg, Some(22.5));

    let avg = chicken_service::avg_eggs_by_weight_and_age(&db, 3.0, 18)
        .await
        .unwrap();
    assert_eq!(avg, Some(22.0));

    // Близкий, но не равный вес не учитывается
    let avg = chicken_service::avg_eggs_by_weight_and_age(&db, 2.51, 12)
        .await
        .unwrap();
    assert_eq!(avg, None);
}

#[tokio::test]
async fn test_low_productivity_is_strictly_below_mean() {
    let db = fixture_db().await;

    let low = chicken_service::low_productivity_chickens(&db).await.unwrap();
    assert_eq!(low.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);

    // Среднее растёт: прежние куры из списка в нём остаются
    chicken_service::create_chicken(&db, chicken(3, 2.8, 15, 40, "Нью-Гемпшир"))
        .await
        .unwrap();
    let low_after = chicken_service::low_productivity_chickens(&db).await.unwrap();
    let ids_after: Vec<i32> = low_after.iter().map(|c| c.id).collect();
    assert!(ids_after.contains(&2));
    assert!(!ids_after.contains(&3));
}

#[tokio::test]
async fn test_low_productivity_with_equal_eggs_is_empty() {
    let db = setup_db().await;
    farm_repository::create_cage(&db, 1).await.unwrap();
    farm_repository::create_cage(&db, 2).await.unwrap();
    chicken_service::create_chicken(&db, chicken(1, 2.0, 10, 20, "Брама"))
        .await
        .unwrap();
    chicken_service::create_chicken(&db, chicken(2, 2.0, 10, 20, "Брама"))
        .await
        .unwrap();

    assert!(chicken_service::low_productivity_chickens(&db)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_most_productive_tie_goes_to_first_inserted() {
    let db = fixture_db().await;
    chicken_service::create_chicken(&db, chicken(3, 2.8, 15, 25, "Нью-Гемпшир"))
        .await
        .unwrap();

    let best = chicken_service::most_productive_chicken(&db).await.unwrap();
    assert_eq!(best.id, 1);
}

#[tokio::test]
async fn test_most_productive_on_empty_farm_is_not_found() {
    let db = setup_db().await;

    let err = chicken_service::most_productive_chicken(&db)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
}

// ── Работники ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_employee_cages_mirror_submitted_set() {
    let db = fixture_db().await;

    let created =
        employee_service::create_employee(&db, employee("Сидоров", "3456 789012", vec![3, 1]))
            .await
            .unwrap();
    let read = employee_service::get_employee(&db, created.id).await.unwrap();
    assert_eq!(sorted(read.cages), vec![1, 3]);

    let updated = employee_service::update_employee(
        &db,
        created.id,
        employee("Сидоров", "3456 789012", vec![2, 3]),
    )
    .await
    .unwrap();
    assert_eq!(sorted(updated.cages), vec![2, 3]);

    let links = employee_repository::find_cage_links(&db, created.id)
        .await
        .unwrap();
    assert_eq!(sorted(links.iter().map(|l| l.cage_id).collect()), vec![2, 3]);

    employee_service::update_employee(
        &db,
        created.id,
        employee("Сидоров", "3456 789012", vec![]),
    )
    .await
    .unwrap();
    assert!(employee_repository::find_cage_links(&db, created.id)
        .await
        .unwrap()
        .is_empty());
    assert!(employee_service::get_employee(&db, created.id)
        .await
        .unwrap()
        .cages
        .is_empty());
}

#[tokio::test]
async fn test_repeated_cage_ids_are_stored_once() {
    let db = fixture_db().await;
    let range = DateRange::new("2024-01-01", "2024-01-31");
    farm_service::create_record(&db, record("2024-01-05", 1, 1, true))
        .await
        .unwrap();

    let created =
        employee_service::create_employee(&db, employee("Дубль", "3456 789012", vec![1, 1]))
            .await
            .unwrap();
    assert_eq!(created.cages, vec![1]);
    assert_eq!(
        employee_service::get_employee(&db, created.id)
            .await
            .unwrap()
            .cages,
        vec![1]
    );
    assert_eq!(
        employee_repository::find_cage_links(&db, created.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        employee_service::employee_chicken_count(&db, created.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        employee_service::employee_egg_count(&db, created.id, &range)
            .await
            .unwrap(),
        1
    );
    let counts = employee_service::all_employee_chicken_counts(&db)
        .await
        .unwrap();
    assert_eq!(counts.get(&created.id), Some(&1));

    let updated = employee_service::update_employee(
        &db,
        created.id,
        employee("Дубль", "3456 789012", vec![2, 1, 2]),
    )
    .await
    .unwrap();
    assert_eq!(updated.cages, vec![1, 2]);
    assert_eq!(
        employee_repository::find_cage_links(&db, created.id)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        employee_service::employee_chicken_count(&db, created.id)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_employees_may_share_a_cage() {
    let db = fixture_db().await;

    let created =
        employee_service::create_employee(&db, employee("Сидоров", "3456 789012", vec![1]))
            .await
            .unwrap();

    assert_eq!(created.cages, vec![1]);
    assert_eq!(employee_service::employee_chicken_count(&db, 1).await.unwrap(), 1);
    assert_eq!(
        employee_service::employee_chicken_count(&db, created.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_create_employee_with_missing_cage_creates_nothing() {
    let db = fixture_db().await;

    let err =
        employee_service::create_employee(&db, employee("Сидоров", "3456 789012", vec![1, 999]))
            .await
            .unwrap_err();

    assert!(matches!(err, AppError::CageNotFound(999)), "{err:?}");
    assert_eq!(employee_service::list_employees(&db).await.unwrap().len(), 2);
    assert!(employee_repository::find_cage_links(&db, 3)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_update_employee_with_missing_cage_keeps_old_cages() {
    let db = fixture_db().await;

    let err =
        employee_service::update_employee(&db, 1, employee("Иванов", "1234 567890", vec![999]))
            .await
            .unwrap_err();

    assert!(matches!(err, AppError::CageNotFound(999)), "{err:?}");
    assert_eq!(employee_service::get_employee(&db, 1).await.unwrap().cages, vec![1]);
}

#[tokio::test]
async fn test_failed_employee_update_rolls_back_cages() {
    let db = fixture_db().await;

    // Паспорт работника 1 занят: запись падает уже после проверки клеток
    let err =
        employee_service::update_employee(&db, 2, employee("Петров", "1234 567890", vec![3]))
            .await
            .unwrap_err();

    assert!(matches!(err, AppError::Internal(_)), "{err:?}");
    let unchanged = employee_service::get_employee(&db, 2).await.unwrap();
    assert_eq!(unchanged.cages, vec![2]);
    assert_eq!(unchanged.passport_data, "2345 678901");
    assert_eq!(
        employee_repository::find_cage_links(&db, 2)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_update_missing_employee_fails() {
    let db = fixture_db().await;

    let err = employee_service::update_employee(&db, 50, employee("Никто", "0000 000000", vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmployeeNotFound(50)), "{err:?}");
}

#[tokio::test]
async fn test_duplicate_passport_is_rejected_by_storage() {
    let db = fixture_db().await;

    let err = employee_service::create_employee(&db, employee("Двойник", "1234 567890", vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Internal(_)), "{err:?}");
    assert_eq!(employee_service::list_employees(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_employee_removes_cage_links() {
    let db = fixture_db().await;

    employee_service::delete_employee(&db, 1).await.unwrap();

    let err = employee_service::get_employee(&db, 1).await.unwrap_err();
    assert!(matches!(err, AppError::EmployeeNotFound(1)), "{err:?}");
    assert!(employee_repository::find_cage_links(&db, 1)
        .await
        .unwrap()
        .is_empty());

    let err = employee_service::delete_employee(&db, 1).await.unwrap_err();
    assert!(matches!(err, AppError::EmployeeNotFound(1)), "{err:?}");
}

#[tokio::test]
async fn test_employee_counts_require_existing_employee() {
    let db = fixture_db().await;
    let range = DateRange::new("2024-01-01", "2024-12-31");

    let err = employee_service::employee_chicken_count(&db, 9)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmployeeNotFound(9)), "{err:?}");

    let err = employee_service::employee_egg_count(&db, 9, &range)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmployeeNotFound(9)), "{err:?}");
}

#[tokio::test]
async fn test_employee_egg_count_in_date_range() {
    let db = fixture_db().await;
    for r in [
        record("2024-01-01", 1, 1, true),
        record("2024-01-02", 1, 1, true),
        record("2024-01-03", 1, 1, false),
        record("2024-02-01", 1, 1, true),
        record("2024-01-02", 2, 2, true),
    ] {
        farm_service::create_record(&db, r).await.unwrap();
    }
    let january = DateRange::new("2024-01-01", "2024-01-31");

    assert_eq!(employee_service::employee_egg_count(&db, 1, &january).await.unwrap(), 2);
    assert_eq!(employee_service::employee_egg_count(&db, 2, &january).await.unwrap(), 1);

    let counts = employee_service::all_employee_egg_counts(&db, &january)
        .await
        .unwrap();
    assert_eq!(counts.get(&1), Some(&2));
    assert_eq!(counts.get(&2), Some(&1));

    // Границы периода включаются
    let one_day = DateRange::new("2024-02-01", "2024-02-01");
    assert_eq!(employee_service::employee_egg_count(&db, 1, &one_day).await.unwrap(), 1);
}

#[tokio::test]
async fn test_all_counts_are_join_driven() {
    let db = fixture_db().await;
    employee_service::create_employee(&db, employee("Сидоров", "3456 789012", vec![3]))
        .await
        .unwrap();

    let counts = employee_service::all_employee_chicken_counts(&db)
        .await
        .unwrap();
    assert_eq!(counts.get(&1), Some(&1));
    assert_eq!(counts.get(&2), Some(&1));
    assert_eq!(counts.get(&3), None);
}

// ── Отчёты ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_backfills_zero_for_every_employee() {
    let db = fixture_db().await;
    employee_service::create_employee(&db, employee("Сидоров", "3456 789012", vec![3]))
        .await
        .unwrap();
    farm_service::create_record(&db, record("2024-03-01", 1, 1, true))
        .await
        .unwrap();
    let range = DateRange::new("2024-03-01", "2024-03-31");

    let chicken_counts = report_service::chicken_counts_by_employee(&db).await.unwrap();
    assert_eq!(chicken_counts.len(), 3);
    assert_eq!(chicken_counts[&3], 0);

    let egg_counts = report_service::egg_counts_by_employee(&db, &range)
        .await
        .unwrap();
    assert_eq!(egg_counts.len(), 3);
    assert_eq!(egg_counts[&1], 1);
    assert_eq!(egg_counts[&2], 0);
    assert_eq!(egg_counts[&3], 0);

    let stats = report_service::employee_egg_stats(&db, &range).await.unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0].employee_name, "Иванов Иван Иванович");
    assert_eq!(stats[0].egg_count, 1);
    assert_eq!(stats[2].egg_count, 0);

    let stats = report_service::employee_chicken_count_stats(&db).await.unwrap();
    let counts: Vec<u64> = stats.iter().map(|s| s.chicken_count).collect();
    assert_eq!(counts, vec![1, 1, 0]);
}

#[tokio::test]
async fn test_total_egg_stats_uses_egg_price() {
    let db = fixture_db().await;
    for r in [
        record("2024-05-01", 1, 1, true),
        record("2024-05-02", 1, 1, true),
        record("2024-05-02", 2, 2, true),
        record("2024-05-03", 2, 2, false),
    ] {
        farm_service::create_record(&db, r).await.unwrap();
    }
    let range = DateRange::new("2024-05-01", "2024-05-31");

    let stats = report_service::total_egg_stats(&db, &range).await.unwrap();
    assert_eq!(stats.total_eggs, 3);
    assert_eq!(stats.total_cost, 3.0 * DEFAULT_EGG_PRICE);

    farm_service::set_config(&db, EGG_PRICE_KEY, "12.5")
        .await
        .unwrap();
    let stats = report_service::total_egg_stats(&db, &range).await.unwrap();
    assert_eq!(stats.total_cost, 37.5);

    farm_service::set_config(&db, EGG_PRICE_KEY, "дорого")
        .await
        .unwrap();
    let stats = report_service::total_egg_stats(&db, &range).await.unwrap();
    assert_eq!(stats.total_cost, 3.0 * DEFAULT_EGG_PRICE);
}

#[tokio::test]
async fn test_most_productive_chicken_stats_has_cage_number() {
    let db = setup_db().await;
    // Номер клетки не совпадает с её id
    farm_repository::create_cage(&db, 10).await.unwrap();
    farm_repository::create_cage(&db, 20).await.unwrap();
    chicken_service::create_chicken(&db, chicken(1, 2.0, 10, 18, "Брама"))
        .await
        .unwrap();
    chicken_service::create_chicken(&db, chicken(2, 2.0, 10, 31, "Брама"))
        .await
        .unwrap();

    let stats = report_service::most_productive_chicken_stats(&db)
        .await
        .unwrap();
    assert_eq!(stats.chicken_id, 2);
    assert_eq!(stats.cage_id, 2);
    assert_eq!(stats.cage_number, 20);
    assert_eq!(stats.egg_per_month, 31);
}

#[test]
fn test_backfill_zero_keeps_employee_order() {
    use crate::repository::employee_repository::Employee;
    use std::collections::BTreeMap;

    let employees: Vec<Employee> = [4, 7]
        .into_iter()
        .map(|id| Employee {
            id,
            full_name: format!("Работник {id}"),
            passport_data: id.to_string(),
            salary: 0.0,
            cages: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        })
        .collect();
    let counts = BTreeMap::from([(7, 3), (99, 5)]);

    let filled = report_service::backfill_zero(&counts, &employees);
    assert_eq!(filled, BTreeMap::from([(4, 0), (7, 3)]));
}

// ── Ферма ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_cages() {
    let db = fixture_db().await;

    let empty = farm_service::empty_cages(&db).await.unwrap();
    assert_eq!(empty.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3]);

    chicken_service::create_chicken(&db, chicken(3, 2.0, 10, 20, "Брама"))
        .await
        .unwrap();
    assert!(farm_service::empty_cages(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cage_with_most_eggs() {
    let db = fixture_db().await;
    for r in [
        record("2024-01-01", 1, 1, true),
        record("2024-01-01", 2, 2, true),
        record("2024-01-02", 2, 2, true),
        record("2024-01-03", 1, 1, false),
        record("2024-01-04", 1, 1, false),
    ] {
        farm_service::create_record(&db, r).await.unwrap();
    }

    let cage = chicken_service::cage_with_most_eggs(&db).await.unwrap();
    assert_eq!(cage.id, 2);
    assert_eq!(cage.number, 2);
}

#[tokio::test]
async fn test_cage_with_most_eggs_without_records_is_not_found() {
    let db = fixture_db().await;

    let err = chicken_service::cage_with_most_eggs(&db).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn test_farm_record_refs_are_checked() {
    let db = fixture_db().await;

    let err = farm_service::create_record(&db, record("2024-01-01", 9, 1, true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CageNotFound(9)), "{err:?}");

    let err = farm_service::create_record(&db, record("2024-01-01", 1, 9, true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ChickenNotFound(9)), "{err:?}");
}

#[tokio::test]
async fn test_farm_record_crud() {
    let db = fixture_db().await;

    let created = farm_service::create_record(&db, record("2024-01-01", 1, 1, false))
        .await
        .unwrap();
    let updated = farm_service::update_record(&db, created.id, record("2024-01-02", 1, 1, true))
        .await
        .unwrap();
    assert_eq!(updated.date, "2024-01-02");
    assert!(updated.has_egg);
    assert_eq!(updated.created_at, created.created_at);

    assert_eq!(
        farm_service::records_for_chicken(&db, 1).await.unwrap(),
        vec![updated.clone()]
    );
    assert!(
        farm_service::records_in_range(&db, &DateRange::new("2024-01-01", "2024-01-01"))
            .await
            .unwrap()
            .is_empty()
    );

    farm_service::delete_record(&db, created.id).await.unwrap();
    let err = farm_service::get_record(&db, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn test_set_config_upserts() {
    let db = setup_db().await;

    let err = farm_service::get_config(&db, "egg_price").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    let first = farm_service::set_config(&db, "egg_price", "10.0").await.unwrap();
    let second = farm_service::set_config(&db, "egg_price", "11.0").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(farm_service::get_config(&db, "egg_price").await.unwrap(), "11.0");
    assert_eq!(farm_repository::egg_price(&db).await.unwrap(), 11.0);
}

#[tokio::test]
async fn test_seed_runs_only_on_empty_database() {
    let db = setup_db().await;

    assert!(crate::seed::seed_if_empty(&db).await.unwrap());
    assert!(!crate::seed::seed_if_empty(&db).await.unwrap());

    assert_eq!(farm_service::list_cages(&db).await.unwrap().len(), 5);
    assert_eq!(chicken_service::list_chickens(&db).await.unwrap().len(), 3);

    let employees = employee_service::list_employees(&db).await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(sorted(employees[0].cages.clone()), vec![1, 2]);
    assert_eq!(sorted(employees[1].cages.clone()), vec![3, 4, 5]);

    assert_eq!(farm_repository::egg_price(&db).await.unwrap(), 10.0);
    assert_eq!(farm_service::empty_cages(&db).await.unwrap().len(), 2);
}

// ── Ошибки ───────────────────────────────────────────────────────────────────

#[test]
fn test_error_status_codes() {
    use axum::http::StatusCode;

    assert_eq!(AppError::ChickenNotFound(1).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::EmployeeNotFound(1).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AppError::CageNotFound(1).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::CageOccupied(1).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Internal("x".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_date_range_query_requires_both_dates() {
    use crate::api::DateRangeQuery;

    let ok = DateRangeQuery {
        start_date: Some("2024-01-01".into()),
        end_date: Some("2024-01-31".into()),
    }
    .require()
    .unwrap();
    assert_eq!(ok, DateRange::new("2024-01-01", "2024-01-31"));

    for query in [
        DateRangeQuery::default(),
        DateRangeQuery {
            start_date: Some("2024-01-01".into()),
            end_date: None,
        },
        DateRangeQuery {
            start_date: Some(String::new()),
            end_date: Some("2024-01-31".into()),
        },
    ] {
        assert!(matches!(query.require(), Err(AppError::BadRequest(_))));
    }
}

// ── HTTP интеграционные тесты ────────────────────────────────────────────────

mod integration {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn build_test_app() -> axum::Router {
        use crate::api::{build_router, AppState};

        let db = fixture_db().await;
        build_router(AppState { db })
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn send_json(
        app: &axum::Router,
        method: &str,
        uri: &str,
        body: String,
    ) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = build_test_app().await;

        let (status, body) = get(&app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], true);
    }

    #[tokio::test]
    async fn test_most_productive_and_low_productivity_reports() {
        let app = build_test_app().await;

        let (status, body) = get(&app, "/api/reports/most-productive-chicken").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chicken_id"], 1);
        assert_eq!(body["cage_id"], 1);
        assert_eq!(body["cage_number"], 1);
        assert_eq!(body["egg_per_month"], 25);

        let (status, body) = get(&app, "/api/reports/low-productivity-chickens").await;
        assert_eq!(status, StatusCode::OK);
        let low = body.as_array().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0]["cage_id"], 2);
        assert_eq!(low[0]["egg_per_month"], 22);

        let (status, body) = get(&app, "/api/chickens/most-productive").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_create_employee_with_repeated_cage() {
        let app = build_test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/employees",
            json!({
                "full_name": "Дубль",
                "passport_data": "3456 789012",
                "salary": 1.0,
                "cages": [1, 1]
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["cages"], json!([1]));

        let id = body["id"].as_i64().unwrap();
        let (status, body) = get(&app, &format!("/api/employees/{id}/chicken-count")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chicken_count"], 1);
    }

    #[tokio::test]
    async fn test_create_employee_with_free_cage() {
        let app = build_test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/employees",
            json!({
                "full_name": "Сидоров Сидор Сидорович",
                "passport_data": "3456 789012",
                "salary": 40000.0,
                "cages": [3]
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["cages"], json!([3]));
        assert_eq!(body["full_name"], "Сидоров Сидор Сидорович");

        let (_, body) = get(&app, &format!("/api/employees/{}", body["id"])).await;
        assert_eq!(body["cages"], json!([3]));
    }

    #[tokio::test]
    async fn test_create_employee_with_missing_cage_is_server_error() {
        let app = build_test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/employees",
            json!({
                "full_name": "Сидоров Сидор Сидорович",
                "passport_data": "3456 789012",
                "salary": 40000.0,
                "cages": [999]
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("999"));

        let (_, body) = get(&app, "/api/employees").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chicken_crud_over_http() {
        let app = build_test_app().await;

        let (status, created) = send_json(
            &app,
            "POST",
            "/api/chickens",
            json!({
                "cage_id": 3,
                "weight": 2.8,
                "age": 15,
                "egg_per_month": 28,
                "breed": "Нью-Гемпшир"
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send_json(
            &app,
            "PUT",
            &format!("/api/chickens/{id}"),
            json!({
                "cage_id": 3,
                "weight": 3.1,
                "age": 16,
                "egg_per_month": 27,
                "breed": "Нью-Гемпшир"
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["weight"], 3.1);

        let (status, _) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/chickens/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&app, &format!("/api/chickens/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_chicken_in_occupied_cage_is_server_error() {
        let app = build_test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/chickens",
            json!({ "cage_id": 1, "weight": 2.0, "age": 10, "egg_per_month": 20, "breed": "Брама" })
                .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("занята"));
    }

    #[tokio::test]
    async fn test_bad_input_is_bad_request() {
        let app = build_test_app().await;

        let (status, _) = get(&app, "/api/chickens/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send_json(&app, "POST", "/api/chickens", "{ не json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/api/chickens/avg-eggs?age=12").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/api/chickens/avg-eggs?weight=heavy&age=12").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(&app, "/api/reports/egg-stats?start_date=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("end_date"));

        let (status, _) = get(&app, "/api/employees/egg-counts").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/api/employees/1/egg-count?end_date=2024-01-31").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_avg_eggs_over_http() {
        let app = build_test_app().await;

        let (status, body) = get(&app, "/api/chickens/avg-eggs?weight=2.5&age=12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["avg_eggs"], 25.0);
        assert_eq!(body["weight"], 2.5);
        assert_eq!(body["age"], 12);

        let (status, body) = get(&app, "/api/chickens/avg-eggs?weight=9.9&age=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["avg_eggs"].is_null());
    }

    #[tokio::test]
    async fn test_list_chickens_by_weight_and_age() {
        let app = build_test_app().await;

        let (status, body) = get(&app, "/api/chickens").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = get(&app, "/api/chickens?weight=3.0&age=18").await;
        assert_eq!(status, StatusCode::OK);
        let found = body.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["breed"], "Род-Айленд");

        let (status, _) = get(&app, "/api/chickens?weight=3.0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_all_employee_counts_include_zeros() {
        let app = build_test_app().await;
        send_json(
            &app,
            "POST",
            "/api/employees",
            json!({
                "full_name": "Сидоров",
                "passport_data": "3456 789012",
                "salary": 1.0,
                "cages": []
            })
            .to_string(),
        )
        .await;
        send_json(
            &app,
            "POST",
            "/api/farm-records",
            json!({ "date": "2024-01-10", "cage_id": 1, "chicken_id": 1, "has_egg": true })
                .to_string(),
        )
        .await;

        let (status, body) = get(&app, "/api/employees/chicken-counts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"], json!({ "1": 1, "2": 1, "3": 0 }));

        let (status, body) = get(
            &app,
            "/api/employees/egg-counts?start_date=2024-01-01&end_date=2024-01-31",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"], json!({ "1": 1, "2": 0, "3": 0 }));
        assert_eq!(body["start_date"], "2024-01-01");

        let (status, body) = get(
            &app,
            "/api/reports/employee-egg-stats?start_date=2024-01-01&end_date=2024-01-31",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"].as_array().unwrap().len(), 3);

        let (status, body) = get(&app, "/api/reports/employee-chicken-counts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[2]["chicken_count"], 0);

        let (status, body) = get(
            &app,
            "/api/reports/egg-stats?start_date=2024-01-01&end_date=2024-01-31",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_eggs"], 1);
        assert_eq!(body["total_cost"], DEFAULT_EGG_PRICE);
    }

    #[tokio::test]
    async fn test_employee_not_found_over_http() {
        let app = build_test_app().await;

        let (status, _) = get(&app, "/api/employees/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&app, "/api/employees/42/chicken-count").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(&app, "/api/employees/1/chicken-count").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "employee_id": 1, "chicken_count": 1 }));
    }

    #[tokio::test]
    async fn test_cages_and_config_over_http() {
        let app = build_test_app().await;

        let (status, body) = get(&app, "/api/cages/empty").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["number"], 3);

        let (status, body) =
            send_json(&app, "POST", "/api/cages", json!({ "number": 4 }).to_string()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["number"], 4);

        let (status, _) = get(&app, "/api/cages/77").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = get(&app, "/api/config/egg_price").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send_json(
            &app,
            "PUT",
            "/api/config/egg_price",
            json!({ "value": "15" }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&app, "/api/config/egg_price").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "key": "egg_price", "value": "15" }));
    }
}
