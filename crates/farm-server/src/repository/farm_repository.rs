//! Хранилище фермы: журнал яйценоскости, клетки и параметры конфигурации.

use super::{chicken_repository, now, DateRange};
use farm_entities::cages::{self, Entity as CageEntity};
use farm_entities::config_params::{self, Entity as ConfigEntity};
use farm_entities::farm_records::{self, Entity as FarmRecordEntity};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

/// Ключ параметра с ценой одного яйца.
pub const EGG_PRICE_KEY: &str = "egg_price";

/// Цена яйца, если параметр не задан или не разбирается как число.
pub const DEFAULT_EGG_PRICE: f64 = 10.0;

/// Запись журнала без служебных полей.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmRecordData {
    pub date: String,
    pub cage_id: i32,
    pub chicken_id: i32,
    pub has_egg: bool,
}

// ── Журнал ──────────────────────────────────────────────────────────────────

pub async fn create_record<C: ConnectionTrait>(
    db: &C,
    data: FarmRecordData,
) -> Result<farm_records::Model, DbErr> {
    let now = now();
    farm_records::ActiveModel {
        date: Set(data.date),
        cage_id: Set(data.cage_id),
        chicken_id: Set(data.chicken_id),
        has_egg: Set(data.has_egg),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_record<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<farm_records::Model>, DbErr> {
    FarmRecordEntity::find_by_id(id).one(db).await
}

pub async fn find_records_by_date_range<C: ConnectionTrait>(
    db: &C,
    range: &DateRange,
) -> Result<Vec<farm_records::Model>, DbErr> {
    FarmRecordEntity::find()
        .filter(range.record_dates())
        .order_by_asc(farm_records::Column::Date)
        .order_by_asc(farm_records::Column::Id)
        .all(db)
        .await
}

pub async fn find_records_by_chicken<C: ConnectionTrait>(
    db: &C,
    chicken_id: i32,
) -> Result<Vec<farm_records::Model>, DbErr> {
    FarmRecordEntity::find()
        .filter(farm_records::Column::ChickenId.eq(chicken_id))
        .order_by_asc(farm_records::Column::Date)
        .order_by_asc(farm_records::Column::Id)
        .all(db)
        .await
}

pub async fn update_record<C: ConnectionTrait>(
    db: &C,
    id: i32,
    data: FarmRecordData,
) -> Result<farm_records::Model, DbErr> {
    farm_records::ActiveModel {
        id: Set(id),
        date: Set(data.date),
        cage_id: Set(data.cage_id),
        chicken_id: Set(data.chicken_id),
        has_egg: Set(data.has_egg),
        updated_at: Set(now()),
        ..Default::default()
    }
    .update(db)
    .await
}

pub async fn delete_record<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    let res = FarmRecordEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Сколько яиц снесено за период (по всей ферме).
pub async fn egg_count_by_date_range<C: ConnectionTrait>(
    db: &C,
    range: &DateRange,
) -> Result<u64, DbErr> {
    FarmRecordEntity::find()
        .filter(range.record_dates())
        .filter(farm_records::Column::HasEgg.eq(true))
        .count(db)
        .await
}

/// Стоимость яиц за период: количество × цена яйца.
pub async fn total_egg_cost<C: ConnectionTrait>(db: &C, range: &DateRange) -> Result<f64, DbErr> {
    let count = egg_count_by_date_range(db, range).await?;
    let price = egg_price(db).await?;
    Ok(count as f64 * price)
}

/// Клетка, в которой снесено больше всего яиц за всё время.
pub async fn cage_with_most_eggs<C: ConnectionTrait>(db: &C) -> Result<Option<i32>, DbErr> {
    let row: Option<(i32, i64)> = FarmRecordEntity::find()
        .select_only()
        .column(farm_records::Column::CageId)
        .column_as(Expr::col(farm_records::Column::Id).count(), "egg_count")
        .filter(farm_records::Column::HasEgg.eq(true))
        .group_by(farm_records::Column::CageId)
        .order_by_desc(Expr::cust("egg_count"))
        .order_by_asc(farm_records::Column::CageId)
        .into_tuple()
        .one(db)
        .await?;

    Ok(row.map(|(cage_id, _)| cage_id))
}

// ── Клетки ──────────────────────────────────────────────────────────────────

pub async fn create_cage<C: ConnectionTrait>(db: &C, number: i32) -> Result<cages::Model, DbErr> {
    let now = now();
    cages::ActiveModel {
        number: Set(number),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_cage<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<cages::Model>, DbErr> {
    CageEntity::find_by_id(id).one(db).await
}

pub async fn find_all_cages<C: ConnectionTrait>(db: &C) -> Result<Vec<cages::Model>, DbErr> {
    CageEntity::find()
        .order_by_asc(cages::Column::Id)
        .all(db)
        .await
}

pub async fn count_cages<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    CageEntity::find().count(db).await
}

/// Клетки, в которых нет ни одной курицы.
///
/// Оба списка идентификаторов вычитываются целиком и сравниваются в памяти.
pub async fn find_empty_cages<C: ConnectionTrait>(db: &C) -> Result<Vec<cages::Model>, DbErr> {
    let all_ids: Vec<i32> = CageEntity::find()
        .select_only()
        .column(cages::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    let occupied = chicken_repository::occupied_cage_ids(db).await?;

    let empty_ids: Vec<i32> = all_ids
        .into_iter()
        .filter(|id| !occupied.contains(id))
        .collect();
    if empty_ids.is_empty() {
        return Ok(Vec::new());
    }

    CageEntity::find()
        .filter(cages::Column::Id.is_in(empty_ids))
        .order_by_asc(cages::Column::Id)
        .all(db)
        .await
}

// ── Параметры конфигурации ──────────────────────────────────────────────────

pub async fn get_config<C: ConnectionTrait>(db: &C, key: &str) -> Result<Option<String>, DbErr> {
    let param = ConfigEntity::find()
        .filter(config_params::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(param.map(|p| p.value))
}

/// Записать параметр: создать, если его нет, иначе перезаписать значение.
pub async fn set_config<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: &str,
) -> Result<config_params::Model, DbErr> {
    let now = now();
    let existing = ConfigEntity::find()
        .filter(config_params::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(record) = existing {
        let mut model: config_params::ActiveModel = record.into();
        model.value = Set(value.to_string());
        model.updated_at = Set(now);
        model.update(db).await
    } else {
        config_params::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}

/// Текущая цена яйца из параметра `egg_price`.
pub async fn egg_price<C: ConnectionTrait>(db: &C) -> Result<f64, DbErr> {
    let price = get_config(db, EGG_PRICE_KEY)
        .await?
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_EGG_PRICE);
    Ok(price)
}
