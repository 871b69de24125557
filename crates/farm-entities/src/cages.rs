//! Entity для таблицы cages.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Номер клетки на ферме
    #[sea_orm(unique)]
    pub number: i32,

    /// Время создания (ISO-8601)
    pub created_at: String,

    /// Время последнего изменения (ISO-8601)
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chickens::Entity")]
    Chickens,
    #[sea_orm(has_many = "super::farm_records::Entity")]
    FarmRecords,
    #[sea_orm(has_many = "super::employee_cages::Entity")]
    EmployeeCages,
}

impl Related<super::chickens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chickens.def()
    }
}

impl Related<super::farm_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmRecords.def()
    }
}

impl Related<super::employee_cages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeCages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
