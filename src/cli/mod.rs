pub mod import;
pub mod init;
pub mod insights;
pub mod preview;
pub mod report;
pub mod status;
pub mod transactions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "penny",
    about = "AI-assisted bank statement importer for personal finances."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and initialize the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// OpenAI model used for classification and insights
        #[arg(long)]
        model: Option<String>,
    },
    /// Show the detected format and the first rows of a statement file.
    Preview {
        /// Path to a CSV or PDF statement
        file: String,
    },
    /// Import a statement: normalize rows, classify with AI, review, save.
    Import {
        /// Path to a CSV or PDF statement
        file: String,
        /// Header of the date column
        #[arg(long)]
        date: Option<String>,
        /// Header of the description column
        #[arg(long)]
        description: Option<String>,
        /// Header of the signed amount column
        #[arg(long)]
        amount: Option<String>,
        /// Header of the withdrawal column (used with --deposit)
        #[arg(long)]
        withdrawal: Option<String>,
        /// Header of the deposit column (used with --withdrawal)
        #[arg(long)]
        deposit: Option<String>,
        /// Header of a pre-assigned category column
        #[arg(long)]
        category: Option<String>,
        /// Header of a reference/check number column
        #[arg(long)]
        reference: Option<String>,
        /// Header of a running balance column
        #[arg(long)]
        balance: Option<String>,
        /// Date layout: MM/dd/yyyy, dd/MM/yyyy, or yyyy-MM-dd
        #[arg(long = "date-format", default_value = "MM/dd/yyyy")]
        date_format: String,
        /// Save without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List stored transactions.
    Transactions {
        /// Show at most N transactions
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Generate reports over stored transactions.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// AI spending analysis over stored transactions.
    Insights,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Spending by category.
    Breakdown {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Year filter: YYYY
        #[arg(long)]
        year: Option<i32>,
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<String>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Monthly inflows and outflows with a running balance.
    Flow {
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
}
