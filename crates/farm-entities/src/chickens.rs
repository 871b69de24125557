//! Entity для таблицы chickens.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chickens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Клетка, в которой живёт курица
    pub cage_id: i32,

    /// Вес в килограммах
    pub weight: f64,

    /// Возраст в месяцах
    pub age: i32,

    /// Количество яиц в месяц
    pub egg_per_month: i32,

    pub breed: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cages::Entity",
        from = "Column::CageId",
        to = "super::cages::Column::Id"
    )]
    Cage,
}

impl Related<super::cages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
