//! Миграция: создание таблиц фермы.

use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_create_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cages::Table)
                    .if_not_exists()
                    .col(id_column(Cages::Id))
                    .col(
                        ColumnDef::new(Cages::Number)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cages::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Cages::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chickens::Table)
                    .if_not_exists()
                    .col(id_column(Chickens::Id))
                    .col(ColumnDef::new(Chickens::CageId).integer().not_null())
                    .col(ColumnDef::new(Chickens::Weight).double().not_null())
                    .col(ColumnDef::new(Chickens::Age).integer().not_null())
                    .col(ColumnDef::new(Chickens::EggPerMonth).integer().not_null())
                    .col(ColumnDef::new(Chickens::Breed).string().not_null())
                    .col(ColumnDef::new(Chickens::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Chickens::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(id_column(Employees::Id))
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Employees::PassportData)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::Salary).double().not_null())
                    .col(ColumnDef::new(Employees::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Employees::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeCages::Table)
                    .if_not_exists()
                    .col(id_column(EmployeeCages::Id))
                    .col(
                        ColumnDef::new(EmployeeCages::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeCages::CageId).integer().not_null())
                    .col(
                        ColumnDef::new(EmployeeCages::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCages::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FarmRecords::Table)
                    .if_not_exists()
                    .col(id_column(FarmRecords::Id))
                    .col(ColumnDef::new(FarmRecords::Date).string().not_null())
                    .col(ColumnDef::new(FarmRecords::CageId).integer().not_null())
                    .col(ColumnDef::new(FarmRecords::ChickenId).integer().not_null())
                    .col(ColumnDef::new(FarmRecords::HasEgg).boolean().not_null())
                    .col(ColumnDef::new(FarmRecords::CreatedAt).string().not_null())
                    .col(ColumnDef::new(FarmRecords::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConfigParams::Table)
                    .if_not_exists()
                    .col(id_column(ConfigParams::Id))
                    .col(
                        ColumnDef::new(ConfigParams::Key)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ConfigParams::Value).string().not_null())
                    .col(ColumnDef::new(ConfigParams::CreatedAt).string().not_null())
                    .col(ColumnDef::new(ConfigParams::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Индексы под проверку занятости клетки и под join-отчёты
        manager
            .create_index(
                Index::create()
                    .table(Chickens::Table)
                    .col(Chickens::CageId)
                    .name("idx_chickens_cage_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(EmployeeCages::Table)
                    .col(EmployeeCages::EmployeeId)
                    .name("idx_employee_cages_employee_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(FarmRecords::Table)
                    .col(FarmRecords::Date)
                    .name("idx_farm_records_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConfigParams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FarmRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeCages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chickens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cages::Table).to_owned())
            .await
    }
}

/// Целочисленный автоинкрементный первичный ключ.
fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(Iden)]
enum Cages {
    Table,
    Id,
    Number,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Chickens {
    Table,
    Id,
    CageId,
    Weight,
    Age,
    EggPerMonth,
    Breed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    FullName,
    PassportData,
    Salary,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum EmployeeCages {
    Table,
    Id,
    EmployeeId,
    CageId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FarmRecords {
    Table,
    Id,
    Date,
    CageId,
    ChickenId,
    HasEgg,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ConfigParams {
    Table,
    Id,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
