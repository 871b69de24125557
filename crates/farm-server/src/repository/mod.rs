//! Слой хранения: CRUD и агрегирующие запросы по таблицам фермы.
//!
//! Функции не содержат бизнес-правил. Отсутствие записи возвращается как
//! `Ok(None)`, остальные ошибки БД пробрасываются как [`sea_orm::DbErr`].
//! Большинство функций обобщены по [`sea_orm::ConnectionTrait`], чтобы сервисы
//! могли вызывать их внутри транзакции.

pub mod chicken_repository;
pub mod employee_repository;
pub mod farm_repository;

use farm_entities::farm_records;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::ColumnTrait;
use serde::{Deserialize, Serialize};

/// Диапазон дат (включительно). Даты сравниваются как строки.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Условие `farm_records.date BETWEEN start_date AND end_date`.
    pub(crate) fn record_dates(&self) -> SimpleExpr {
        farm_records::Column::Date.between(self.start_date.as_str(), self.end_date.as_str())
    }
}

/// Текущее время для полей created_at / updated_at.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
