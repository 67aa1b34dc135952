//! Daylog CLI - health diary in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daylog_core::{LogEvent, LoggingService};

mod commands;
mod output;

use commands::{food, goals, history, logs, show, update, weight};

/// Daylog - daily weight and nutrition diary
#[derive(Parser)]
#[command(name = "dl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a body weight for a day
    Weight {
        /// Date (YYYY-MM-DD or RFC 3339); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Weight to record instead of prompting
        #[arg(long)]
        value: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the diary entry for a day
    Show {
        /// Date (YYYY-MM-DD or RFC 3339); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge fields into a day's entry
    Update {
        /// Date (YYYY-MM-DD or RFC 3339); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Field to set, as key=value (value parsed as JSON, else kept as text)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log an amount of a food or nutrient
    Food {
        /// Nutrition item name
        item: String,
        /// Amount to add
        amount: String,
        /// Date (YYYY-MM-DD or RFC 3339); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries over a date range
    History {
        /// First day (inclusive); defaults to 7 days before --to
        #[arg(long)]
        from: Option<String>,
        /// Last day (inclusive); defaults to today (UTC)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage daily goals
    Goals {
        #[command(subcommand)]
        command: goals::GoalsCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Weight { .. } => "weight",
            Commands::Show { .. } => "show",
            Commands::Update { .. } => "update",
            Commands::Food { .. } => "food",
            Commands::History { .. } => "history",
            Commands::Goals { .. } => "goals",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command_name = cli.command.name();

    let logger = commands::get_logger();
    commands::log_event(&logger, LogEvent::new("command_executed").with_command(command_name));

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, &logger)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new(format!("{}_failed", command_name))
                    .with_command(command_name)
                    .with_error(e.to_string())
                    .with_error_details(format!("{:#}", e)),
            );
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, logger: &Option<LoggingService>) -> Result<()> {
    match cli.command {
        Commands::Weight { date, value, json } => weight::run(logger, date, value, json).await,
        Commands::Show { date, json } => show::run(logger, date, json).await,
        Commands::Update { date, fields, json } => update::run(logger, date, fields, json).await,
        Commands::Food { item, amount, date, json } => {
            food::run(logger, &item, &amount, date, json).await
        }
        Commands::History { from, to, json } => history::run(logger, from, to, json).await,
        Commands::Goals { command } => goals::run(command),
        Commands::Logs { command } => logs::run(logger, command),
    }
}
