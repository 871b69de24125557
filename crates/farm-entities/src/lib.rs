//! Сущности SeaORM базы данных птицефабрики.

pub mod cages;
pub mod chickens;
pub mod config_params;
pub mod employee_cages;
pub mod employees;
pub mod farm_records;
