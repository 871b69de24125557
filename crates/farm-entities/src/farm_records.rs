//! Entity для таблицы farm_records: ежедневный журнал яйценоскости.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Дата наблюдения. Сравнивается как строка, поэтому формат должен
    /// сортироваться лексикографически (ISO-8601).
    pub date: String,

    pub cage_id: i32,

    pub chicken_id: i32,

    /// Снесла ли курица яйцо в этот день
    pub has_egg: bool,

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
