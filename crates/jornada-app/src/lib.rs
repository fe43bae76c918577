//! Jornada - attendance day configuration and quota engine.
//!
//! This crate provides the `jornada` binary's command-line surface:
//!
//! - [`cli`]: argument definitions
//! - [`commands`]: administrative commands run against the day store
//!
//! # Usage
//!
//! ```ignore
//! use clap::Parser;
//! use jornada_app::{cli::Args, commands};
//! use jornada_core::DayConfigStore;
//! use jornada_storage::Database;
//!
//! let args = Args::parse();
//! let mut store = DayConfigStore::load(Database::new()?)?;
//! println!("{}", commands::execute(&mut store, &args.command)?);
//! ```

pub mod cli;
pub mod commands;
