//! Хранилище кур.

use super::now;
use farm_entities::chickens::{ActiveModel, Column, Entity as ChickenEntity, Model};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

/// Данные курицы без служебных полей.
///
/// Сохранение всегда перезаписывает запись целиком: поле, которое клиент не
/// передал, получает значение по умолчанию.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChickenData {
    pub cage_id: i32,
    pub weight: f64,
    pub age: i32,
    pub egg_per_month: i32,
    pub breed: String,
}

pub async fn create<C: ConnectionTrait>(db: &C, data: ChickenData) -> Result<Model, DbErr> {
    let now = now();
    let model = ActiveModel {
        cage_id: Set(data.cage_id),
        weight: Set(data.weight),
        age: Set(data.age),
        egg_per_month: Set(data.egg_per_month),
        breed: Set(data.breed),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    ChickenEntity::find_by_id(id).one(db).await
}

/// Курица, которая сейчас сидит в клетке `cage_id`.
pub async fn find_by_cage<C: ConnectionTrait>(
    db: &C,
    cage_id: i32,
) -> Result<Option<Model>, DbErr> {
    ChickenEntity::find()
        .filter(Column::CageId.eq(cage_id))
        .order_by_asc(Column::Id)
        .one(db)
        .await
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    ChickenEntity::find().order_by_asc(Column::Id).all(db).await
}

/// Куры с точно таким весом и возрастом.
pub async fn find_by_weight_and_age<C: ConnectionTrait>(
    db: &C,
    weight: f64,
    age: i32,
) -> Result<Vec<Model>, DbErr> {
    ChickenEntity::find()
        .filter(Column::Weight.eq(weight))
        .filter(Column::Age.eq(age))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

/// Полная перезапись курицы. Ошибка `RecordNotUpdated`, если записи нет.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    data: ChickenData,
) -> Result<Model, DbErr> {
    let model = ActiveModel {
        id: Set(id),
        cage_id: Set(data.cage_id),
        weight: Set(data.weight),
        age: Set(data.age),
        egg_per_month: Set(data.egg_per_month),
        breed: Set(data.breed),
        updated_at: Set(now()),
        ..Default::default()
    };
    model.update(db).await
}

/// Удалить курицу. Возвращает число удалённых строк.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    let res = ChickenEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Среднее яиц в месяц среди кур с точно таким весом и возрастом.
/// `None`, если таких кур нет.
pub async fn avg_eggs_by_weight_and_age<C: ConnectionTrait>(
    db: &C,
    weight: f64,
    age: i32,
) -> Result<Option<f64>, DbErr> {
    let avg = ChickenEntity::find()
        .select_only()
        .column_as(avg_egg_per_month_expr(), "avg_eggs")
        .filter(Column::Weight.eq(weight))
        .filter(Column::Age.eq(age))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;
    Ok(avg.flatten())
}

/// Среднее яиц в месяц по всему поголовью.
pub async fn avg_egg_per_month<C: ConnectionTrait>(db: &C) -> Result<Option<f64>, DbErr> {
    let avg = ChickenEntity::find()
        .select_only()
        .column_as(avg_egg_per_month_expr(), "avg_eggs")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;
    Ok(avg.flatten())
}

/// Куры, несущие строго меньше среднего по поголовью.
///
/// Два запроса: сначала среднее, потом выборка. Между ними нет транзакции.
pub async fn find_low_productivity<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    let Some(avg) = avg_egg_per_month(db).await? else {
        return Ok(Vec::new());
    };

    ChickenEntity::find()
        .filter(Column::EggPerMonth.lt(avg))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

/// Самая продуктивная курица. При равенстве побеждает добавленная раньше.
pub async fn find_most_productive<C: ConnectionTrait>(db: &C) -> Result<Option<Model>, DbErr> {
    ChickenEntity::find()
        .order_by_desc(Column::EggPerMonth)
        .order_by_asc(Column::Id)
        .one(db)
        .await
}

/// Идентификаторы клеток, в которых сейчас есть куры.
pub async fn occupied_cage_ids<C: ConnectionTrait>(db: &C) -> Result<Vec<i32>, DbErr> {
    ChickenEntity::find()
        .select_only()
        .column(Column::CageId)
        .into_tuple::<i32>()
        .all(db)
        .await
}

fn avg_egg_per_month_expr() -> SimpleExpr {
    Func::avg(Expr::col(Column::EggPerMonth)).into()
}
