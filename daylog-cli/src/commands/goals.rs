//! Goals command - view and edit daily goals in settings.json
//!
//! Changes apply to entries created afterwards; existing entries keep the
//! snapshot they were created with.

use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use colored::Colorize;
use daylog_core::adapters::goals::SettingsGoalsProvider;
use daylog_core::config::Config;
use daylog_core::ports::GoalsProvider;
use daylog_core::GoalTarget;
use rust_decimal::Decimal;

use super::{get_data_dir, resolve_date};
use crate::output;

#[derive(Subcommand)]
pub enum GoalsCommands {
    /// Show the goals that apply on a day
    Show {
        /// Date (YYYY-MM-DD or RFC 3339); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a goal: one value for every day, or seven (Monday first)
    Set {
        /// Goal name, e.g. calories
        name: String,
        /// Target value(s)
        #[arg(required = true, num_args = 1..=7)]
        values: Vec<String>,
    },
    /// Remove a goal
    Remove {
        /// Goal name
        name: String,
    },
}

pub fn run(command: GoalsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    match command {
        GoalsCommands::Show { date, json } => {
            let date = resolve_date(date.as_deref())?;
            let snapshot = SettingsGoalsProvider::from_config(&config).goals_for_date(date);

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            if snapshot.is_empty() {
                output::info("No goals configured");
                return Ok(());
            }

            println!("{}", format!("Goals for {}", date).bold());
            let mut table = output::create_table();
            table.set_header(vec!["Goal", "Target"]);
            for (name, target) in &snapshot.targets {
                table.add_row(vec![name.clone(), target.normalize().to_string()]);
            }
            println!("{}", table);
        }
        GoalsCommands::Set { name, values } => {
            let target = parse_target(&values)?;
            config.set_goal(name.trim(), target);
            config.save(&data_dir)?;
            output::success(&format!("Goal '{}' saved", name.trim()));
        }
        GoalsCommands::Remove { name } => {
            if !config.remove_goal(&name) {
                bail!("Goal '{}' not found", name);
            }
            config.save(&data_dir)?;
            output::success(&format!("Goal '{}' removed", name));
        }
    }

    Ok(())
}

fn parse_target(values: &[String]) -> Result<GoalTarget> {
    let parsed = values
        .iter()
        .map(|v| Decimal::from_str(v.trim()).map_err(|_| anyhow!("Invalid goal value '{}'", v)))
        .collect::<Result<Vec<_>>>()?;

    if parsed.len() == 1 {
        return Ok(GoalTarget::Daily(parsed[0]));
    }

    let weekly: [Decimal; 7] = parsed
        .try_into()
        .map_err(|_| anyhow!("Give one value or seven (Monday to Sunday)"))?;
    Ok(GoalTarget::Weekly(weekly))
}
