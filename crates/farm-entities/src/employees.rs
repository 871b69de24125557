//! Entity для таблицы employees.
//!
//! Список клеток работника хранится отдельно, в таблице employee_cages.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// ФИО работника
    pub full_name: String,

    /// Паспортные данные (уникальны)
    #[sea_orm(unique)]
    pub passport_data: String,

    pub salary: f64,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_cages::Entity")]
    EmployeeCages,
}

impl Related<super::employee_cages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeCages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
