//! Хранилище работников и закреплённых за ними клеток.
//!
//! Строки employee_cages принадлежат работнику: создание, обновление и
//! удаление работника переписывают их в той же транзакции.

use super::{now, DateRange};
use farm_entities::employee_cages::{self, Entity as EmployeeCageEntity};
use farm_entities::employees::{self, Entity as EmployeeEntity};
use farm_entities::{chickens, farm_records};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationDef,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Работник вместе со списком идентификаторов его клеток.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub passport_data: String,
    pub salary: f64,
    pub cages: Vec<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Employee {
    fn from_model(model: employees::Model, cages: Vec<i32>) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            passport_data: model.passport_data,
            salary: model.salary,
            cages,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Данные работника без служебных полей.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeData {
    pub full_name: String,
    pub passport_data: String,
    pub salary: f64,
    pub cages: Vec<i32>,
}

/// Создать работника и его клетки одной транзакцией.
pub async fn create<C>(db: &C, data: EmployeeData) -> Result<Employee, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let cages = cage_set(data.cages);
    let txn = db.begin().await?;
    let now = now();

    let model = employees::ActiveModel {
        full_name: Set(data.full_name),
        passport_data: Set(data.passport_data),
        salary: Set(data.salary),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_cage_links(&txn, model.id, &cages, &now).await?;
    txn.commit().await?;

    Ok(Employee::from_model(model, cages))
}

/// Полностью перезаписать работника: старые клетки удаляются, новые создаются.
pub async fn update<C>(db: &C, id: i32, data: EmployeeData) -> Result<Employee, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let cages = cage_set(data.cages);
    let txn = db.begin().await?;
    let now = now();

    let model = employees::ActiveModel {
        id: Set(id),
        full_name: Set(data.full_name),
        passport_data: Set(data.passport_data),
        salary: Set(data.salary),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .update(&txn)
    .await?;

    EmployeeCageEntity::delete_many()
        .filter(employee_cages::Column::EmployeeId.eq(id))
        .exec(&txn)
        .await?;
    insert_cage_links(&txn, id, &cages, &now).await?;
    txn.commit().await?;

    Ok(Employee::from_model(model, cages))
}

/// Удалить работника вместе с его клетками. Возвращает число удалённых работников.
pub async fn delete<C>(db: &C, id: i32) -> Result<u64, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    EmployeeCageEntity::delete_many()
        .filter(employee_cages::Column::EmployeeId.eq(id))
        .exec(&txn)
        .await?;
    let res = EmployeeEntity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(res.rows_affected)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Employee>, DbErr> {
    let Some(model) = EmployeeEntity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let cages = cage_ids(db, model.id).await?;
    Ok(Some(Employee::from_model(model, cages)))
}

/// Все работники. Клетки дочитываются отдельным запросом на каждого.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Employee>, DbErr> {
    let models = EmployeeEntity::find()
        .order_by_asc(employees::Column::Id)
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(models.len());
    for model in models {
        let cages = cage_ids(db, model.id).await?;
        result.push(Employee::from_model(model, cages));
    }
    Ok(result)
}

/// Строки employee_cages работника в порядке создания.
pub async fn find_cage_links<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
) -> Result<Vec<employee_cages::Model>, DbErr> {
    EmployeeCageEntity::find()
        .filter(employee_cages::Column::EmployeeId.eq(employee_id))
        .order_by_asc(employee_cages::Column::Id)
        .all(db)
        .await
}

/// Сколько кур сидит в клетках работника.
pub async fn chicken_count<C: ConnectionTrait>(db: &C, employee_id: i32) -> Result<u64, DbErr> {
    EmployeeCageEntity::find()
        .join(JoinType::InnerJoin, cage_chickens())
        .filter(employee_cages::Column::EmployeeId.eq(employee_id))
        .count(db)
        .await
}

/// Количество кур по каждому работнику. Работники без кур в ответ не попадают.
pub async fn all_chicken_counts<C: ConnectionTrait>(
    db: &C,
) -> Result<BTreeMap<i32, u64>, DbErr> {
    let rows: Vec<(i32, i64)> = EmployeeCageEntity::find()
        .select_only()
        .column(employee_cages::Column::EmployeeId)
        .column_as(
            Expr::col((chickens::Entity, chickens::Column::Id)).count(),
            "chicken_count",
        )
        .join(JoinType::InnerJoin, cage_chickens())
        .group_by(employee_cages::Column::EmployeeId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(into_count_map(rows))
}

/// Сколько яиц снесено в клетках работника за период.
pub async fn egg_count<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    range: &DateRange,
) -> Result<u64, DbErr> {
    EmployeeCageEntity::find()
        .join(JoinType::InnerJoin, cage_farm_records())
        .filter(employee_cages::Column::EmployeeId.eq(employee_id))
        .filter(range.record_dates())
        .filter(farm_records::Column::HasEgg.eq(true))
        .count(db)
        .await
}

/// Количество яиц за период по каждому работнику. Работники без яиц в ответ не попадают.
pub async fn all_egg_counts<C: ConnectionTrait>(
    db: &C,
    range: &DateRange,
) -> Result<BTreeMap<i32, u64>, DbErr> {
    let rows: Vec<(i32, i64)> = EmployeeCageEntity::find()
        .select_only()
        .column(employee_cages::Column::EmployeeId)
        .column_as(
            Expr::col((farm_records::Entity, farm_records::Column::Id)).count(),
            "egg_count",
        )
        .join(JoinType::InnerJoin, cage_farm_records())
        .filter(range.record_dates())
        .filter(farm_records::Column::HasEgg.eq(true))
        .group_by(employee_cages::Column::EmployeeId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(into_count_map(rows))
}

async fn cage_ids<C: ConnectionTrait>(db: &C, employee_id: i32) -> Result<Vec<i32>, DbErr> {
    let links = find_cage_links(db, employee_id).await?;
    Ok(links.into_iter().map(|l| l.cage_id).collect())
}

async fn insert_cage_links<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    cages: &[i32],
    now: &str,
) -> Result<(), DbErr> {
    for &cage_id in cages {
        employee_cages::ActiveModel {
            employee_id: Set(employee_id),
            cage_id: Set(cage_id),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Клетки работника как множество: без повторов, по возрастанию id.
fn cage_set(cages: Vec<i32>) -> Vec<i32> {
    cages
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn into_count_map(rows: Vec<(i32, i64)>) -> BTreeMap<i32, u64> {
    rows.into_iter()
        .map(|(employee_id, count)| (employee_id, count.max(0) as u64))
        .collect()
}

/// employee_cages ⋈ chickens по cage_id.
fn cage_chickens() -> RelationDef {
    EmployeeCageEntity::belongs_to(chickens::Entity)
        .from(employee_cages::Column::CageId)
        .to(chickens::Column::CageId)
        .into()
}

/// employee_cages ⋈ farm_records по cage_id.
fn cage_farm_records() -> RelationDef {
    EmployeeCageEntity::belongs_to(farm_records::Entity)
        .from(employee_cages::Column::CageId)
        .to(farm_records::Column::CageId)
        .into()
}
