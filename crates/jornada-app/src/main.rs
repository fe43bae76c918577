//! Jornada - attendance day configuration and quota engine.
//!
//! Runs the HTTP API server (`serve`) or a one-shot administrative command
//! against the local database.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use jornada_app::cli::{Args, Command};
use jornada_app::commands;
use jornada_core::day_store::DayConfigStore;
use jornada_server::{Server, ServerConfig};
use jornada_storage::Database;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "jornada", "jornada").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
///
/// The console layer writes to stderr so command output on stdout stays clean.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };
    let console = args.debug || matches!(args.command, Command::Serve { .. });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "jornada={0},jornada_app={0},jornada_core={0},jornada_storage={0},jornada_server={0},warn",
            log_level
        ))
    });

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("jornada")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                if console {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stderr))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                } else {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                }

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => Database::default_db_path().context("resolving database location")?,
    };

    if let Command::Serve { host, port } = &args.command {
        let config = ServerConfig::with_db_path(db_path.to_string_lossy())
            .with_host(host.clone())
            .with_port(*port);

        let server = Server::new(config).await.context("starting API server")?;
        server.run().await.context("running API server")?;
        return Ok(());
    }

    let db = Database::with_path(&db_path)
        .with_context(|| format!("opening database at {}", db_path.display()))?;
    let mut store = DayConfigStore::load(db).context("loading day configuration")?;

    let output = commands::execute(&mut store, &args.command)?;
    println!("{output}");

    Ok(())
}
