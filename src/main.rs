use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::Database;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spotify_etl::{
    config::Config,
    db::enums::JobType,
    handlers,
    jobs::{self, JobExecutor, JobQueue},
    state::AppState,
    storage::LocalStorage,
    tasks,
};

#[derive(Parser)]
#[command(name = "spotify-etl", version, about = "Playlist to warehouse ETL pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP trigger surface, the extract schedule and the storage watchers
    Serve,
    /// Fetch the playlist into raw storage
    Extract,
    /// Normalize every pending raw object into CSV datasets
    Transform,
    /// Load transformed files into the warehouse
    Load {
        /// Truncate the tables and reload every staged file
        #[arg(long)]
        initial: bool,
    },
    /// Extract, transform and ingest in sequence
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect to database
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to the warehouse database")?;
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations completed");

    let store = Arc::new(LocalStorage::new(config.storage_root.clone()));
    tracing::info!("Using local storage at {:?}", config.storage_root);

    let (job_queue, job_receiver) = JobQueue::new(db.clone());
    let state = AppState::new(db, store, config, job_queue);

    match cli.command {
        Command::Serve => serve(state, job_receiver).await,
        Command::Extract => run_stages(&state, &[JobType::Extract]).await,
        Command::Transform => run_stages(&state, &[JobType::Transform]).await,
        Command::Load { initial: true } => run_stages(&state, &[JobType::InitialLoad]).await,
        Command::Load { initial: false } => run_stages(&state, &[JobType::Ingest]).await,
        Command::Run => {
            run_stages(
                &state,
                &[JobType::Extract, JobType::Transform, JobType::Ingest],
            )
            .await
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spotify_etl=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_stages(state: &AppState, stages: &[JobType]) -> Result<()> {
    for job_type in stages {
        let summary = jobs::run_job(state, *job_type).await?;
        tracing::info!("{}: {}", job_type.as_str(), summary);
    }
    Ok(())
}

async fn serve(
    state: AppState,
    job_receiver: tokio::sync::mpsc::UnboundedReceiver<jobs::JobMessage>,
) -> Result<()> {
    tracing::info!("Starting Spotify ETL service...");

    // Start job executor
    let executor = JobExecutor::new(state.clone(), job_receiver);
    tokio::spawn(async move {
        executor.start().await;
    });
    tracing::info!("Job executor started");

    // Start the extract schedule
    let _scheduler = tasks::start_scheduler(state.clone()).await?;
    tracing::info!("Background task scheduler started");

    // Watchers stop when their handles drop
    let _watchers = tasks::start_watchers(&state)?;

    let app = create_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", state.config.server_host, state.config.server_port)
        .parse()
        .context("SERVER_HOST and SERVER_PORT must form a socket address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // API routes (JSON)
        .nest("/api", handlers::api_routes())

        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
