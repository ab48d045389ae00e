use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use clap::{Parser, Subcommand};

mod commands;

mod config;
use config::Config;

mod controllers;

mod db;
use db::Database;

mod error;
pub(crate) use error::ApiResult;

mod ids;

mod rate_limit;
use rate_limit::RateLimiter;

mod types;

#[derive(Clone, FromRef)]
pub struct App {
    pub config: Config,
    pub database: Database,
    pub rate_limiter: RateLimiter,
}

#[derive(Parser)]
#[command(name = "fadebin", version, about = "A pastebin where pastes fade away")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server.
    Serve,
    /// Hard-delete expired and tombstoned pastes.
    PurgeExpired,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let mut database = Database::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    database.migrate().await.context("failed to run migrations")?;

    let rate_limiter = RateLimiter::new(
        config.limits.rate_limit_requests,
        Duration::from_secs(config.limits.rate_limit_window_secs),
    );

    let app = App {
        config,
        database,
        rate_limiter,
    };

    match cli.command {
        Command::Serve => commands::serve::run(app).await,
        Command::PurgeExpired => commands::purge_expired::run(app).await,
    }
}
