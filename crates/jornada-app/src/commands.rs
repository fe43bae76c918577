//! Administrative commands over the day configuration store.

use anyhow::{bail, Context};
use jornada_core::activity::format_hours;
use jornada_core::day_config::{DayConfig, DayType};
use jornada_core::day_store::{DayConfigPersistence, DayConfigStore};
use tracing::debug;

use crate::cli::Command;

/// Runs a store command and returns the text to print.
///
/// `serve` is not a store command and is rejected here.
pub fn execute<P: DayConfigPersistence>(
    store: &mut DayConfigStore<P>,
    command: &Command,
) -> anyhow::Result<String> {
    debug!(?command, "Executing command");

    let output = match command {
        Command::Serve { .. } => bail!("`serve` is handled by the binary, not the store"),

        Command::Set {
            date,
            day_type,
            users,
        } => {
            check_users(*day_type, users)?;
            store
                .set_day_config(*date, *day_type, users)
                .with_context(|| format!("setting {date}"))?;
            match store.day_config(*date) {
                Some(config) => describe(config),
                None => format!("{date}: normal"),
            }
        }

        Command::SetRange {
            start,
            end,
            day_type,
            users,
        } => {
            check_users(*day_type, users)?;
            store
                .set_day_config_range(*start, *end, *day_type, users)
                .with_context(|| format!("setting {start}..={end}"))?;
            let count = store.configs_between(*start, *end).len();
            format!("{count} day(s) configured as {day_type}")
        }

        Command::Remove { date } => {
            let existed = store.day_config(*date).is_some();
            store
                .remove_day_config(*date)
                .with_context(|| format!("removing {date}"))?;
            if existed {
                format!("{date}: removed")
            } else {
                format!("{date}: nothing to remove")
            }
        }

        Command::RemoveRange { start, end } => {
            let count = store.configs_between(*start, *end).len();
            store
                .remove_day_config_range(*start, *end)
                .with_context(|| format!("removing {start}..={end}"))?;
            format!("{count} day(s) removed")
        }

        Command::Clear => {
            let count = store.len();
            store
                .clear_all_days()
                .context("clearing day configurations")?;
            format!("{count} day(s) cleared")
        }

        Command::Show { from, to, json } => {
            let days: Vec<&DayConfig> = match (from, to) {
                (Some(from), Some(to)) => store.configs_between(*from, *to),
                _ => store.days().collect(),
            };

            if *json {
                serde_json::to_string_pretty(&days)?
            } else if days.is_empty() {
                "no configured days".to_string()
            } else {
                days.into_iter()
                    .map(describe)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }

        Command::Hours { date, user } => match user {
            Some(user) => {
                let hours = store.hours_for_user(*date, user);
                let recovery = if store.has_recovery_for_user(*date, user) {
                    " (recovery)"
                } else {
                    ""
                };
                format!("{date} {user}: {}{recovery}", format_hours(hours))
            }
            None => format!("{date}: {}", format_hours(store.hours_for_day(*date))),
        },

        Command::OverrideHours { date, hours } => {
            if !hours.is_finite() || *hours < 0.0 {
                bail!("hours must be a non-negative number, got {hours}");
            }
            let updated = store
                .override_required_hours(*date, *hours)
                .with_context(|| format!("overriding hours for {date}"))?;
            if !updated {
                bail!("{date} has no configuration; set its type first");
            }
            format!("{date}: {} required", format_hours(*hours))
        }
    };

    Ok(output)
}

fn check_users(day_type: DayType, users: &[String]) -> anyhow::Result<()> {
    if day_type.requires_users() && users.is_empty() {
        bail!("{day_type} days need at least one --user");
    }
    Ok(())
}

/// One-line summary of a configured day.
fn describe(config: &DayConfig) -> String {
    let mut line = format!(
        "{}  {:<12}  {}",
        config.date,
        config.day_type,
        format_hours(config.required_hours)
    );
    if config.user_count() > 0 {
        let users: Vec<&str> = config
            .applied_to
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        line.push_str(&format!("  [{}]", users.join(", ")));
    }
    line
}
