mod ai;
mod cli;
mod db;
mod detect;
mod error;
mod fmt;
mod importer;
mod mapping;
mod models;
mod normalize;
mod reports;
mod settings;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ReportCommands};

fn main() {
    // Tables and prompts own stdout; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir, model } => cli::init::run(data_dir, model),
        Commands::Preview { file } => cli::preview::run(&file),
        Commands::Import {
            file,
            date,
            description,
            amount,
            withdrawal,
            deposit,
            category,
            reference,
            balance,
            date_format,
            yes,
        } => cli::import::run(
            &file,
            date,
            description,
            amount,
            withdrawal,
            deposit,
            category,
            reference,
            balance,
            &date_format,
            yes,
        ),
        Commands::Transactions { limit } => cli::transactions::run(limit),
        Commands::Report { command } => match command {
            ReportCommands::Breakdown {
                month,
                year,
                from_date,
                to_date,
            } => cli::report::breakdown(month, year, from_date, to_date),
            ReportCommands::Flow { month, year } => cli::report::flow(month, year),
        },
        Commands::Insights => cli::insights::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
