use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizza_restaurant_service::handlers::{router, AppState};
use pizza_restaurant_service::{seed, store, Config};

/// Serves the API when run without a subcommand.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run migrations and serve the HTTP API
    Serve,
    /// Run migrations and replace all data with the sample set
    Seed,
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pool = store::establish_pool(&config.database_url, config.pool_size)?;
    store::with_connection(&pool, |conn| store::run_migrations(conn)).await?;

    match cli.into_command() {
        Commands::Serve => serve(config, pool).await,
        Commands::Seed => {
            let summary = store::with_connection(&pool, |conn| {
                Ok(seed::load_sample_data(conn))
            })
            .await??;
            info!(?summary, database_url = %config.database_url, "database seeded");
            Ok(())
        }
    }
}

async fn serve(config: Config, pool: store::DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState { pool });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Pizza restaurant service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
