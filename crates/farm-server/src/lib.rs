//! Ядро сервера учёта птицефабрики.

pub mod api;
pub mod config;
pub mod error;
pub mod repository;
pub mod seed;
pub mod services;

#[cfg(test)]
mod tests;

use api::AppState;
use config::ServerConfig;
use farm_migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing::info;

/// Запустить сервер фермы.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    // 1. Подключение к БД
    info!("Подключение к базе данных: {}", config.db_url);
    let db: DatabaseConnection = Database::connect(&config.db_url).await?;

    // 2. Схема
    info!("Выполнение миграций...");
    Migrator::up(&db, None).await?;

    // 3. Начальные данные
    if config.seed {
        seed::seed_if_empty(&db).await?;
    }

    // 4. Маршрутизатор
    let app = api::build_router(AppState { db });

    // 5. Graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Получен сигнал завершения, останавливаю сервер...");
        let _ = shutdown_tx.send(true);
    });

    // 6. Запуск сервера
    serve(&config, app, shutdown_rx).await?;

    info!("Сервер фермы остановлен");
    Ok(())
}

async fn serve(
    config: &ServerConfig,
    app: axum::Router,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config.listen.parse()?;
    info!("Запуск HTTP сервера на {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;
    Ok(())
}
