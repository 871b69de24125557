//! Точка входа сервера птицефабрики.

use clap::Parser;
use farm_server::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "farm-server",
    about = "Учёт птицефабрики: куры, клетки, работники и отчёты"
)]
struct Cli {
    /// Адрес для прослушивания (host:port)
    #[arg(long, default_value = "0.0.0.0:8080", env = "FARM_LISTEN")]
    listen: String,

    /// URL базы данных
    #[arg(
        long,
        default_value = "sqlite:./chicken_farm.db?mode=rwc",
        env = "DATABASE_URL"
    )]
    db_url: String,

    /// Не заполнять пустую базу начальными данными
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig {
        listen: cli.listen,
        db_url: cli.db_url,
        seed: !cli.skip_seed,
    };

    farm_server::run(config).await
}
