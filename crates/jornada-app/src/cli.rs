//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jornada_core::date_key::DateKey;
use jornada_core::day_config::DayType;
use jornada_server::{DEFAULT_HOST, DEFAULT_PORT};

/// Jornada - attendance day configuration and quota engine
#[derive(Parser, Debug)]
#[command(name = "jornada", version, about)]
pub struct Args {
    /// Database file (default: app data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Configure a single day (normal, feriado, recuperacion)
    Set {
        date: DateKey,
        day_type: DayType,
        /// User a recovery day applies to (repeatable)
        #[arg(long = "user")]
        users: Vec<String>,
    },

    /// Configure every day from START to END inclusive
    SetRange {
        start: DateKey,
        end: DateKey,
        day_type: DayType,
        #[arg(long = "user")]
        users: Vec<String>,
    },

    /// Remove a day's configuration
    Remove { date: DateKey },

    /// Remove every configuration from START to END inclusive
    RemoveRange { start: DateKey, end: DateKey },

    /// Remove every configuration
    Clear,

    /// List configured days
    Show {
        #[arg(long, requires = "to")]
        from: Option<DateKey>,
        #[arg(long, requires = "from")]
        to: Option<DateKey>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Required hours for a day, or for a user on that day
    Hours {
        date: DateKey,
        #[arg(long)]
        user: Option<String>,
    },

    /// Change the required hours of a configured day
    OverrideHours { date: DateKey, hours: f64 },
}
