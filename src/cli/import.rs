use std::io::Write;
use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::ai::OpenAiClient;
use crate::db::{get_connection, init_db, save_statement};
use crate::detect::detect_kind;
use crate::error::Result;
use crate::fmt::money;
use crate::importer::{parse_csv_file, parse_pdf_file};
use crate::mapping::{AmountType, ColumnMapping, DateFormat};
use crate::models::{ParseOutcome, StatementKind, StatementRecord, TransactionRecord};
use crate::settings::{get_data_dir, require_ai_config};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &str,
    date: Option<String>,
    description: Option<String>,
    amount: Option<String>,
    withdrawal: Option<String>,
    deposit: Option<String>,
    category: Option<String>,
    reference: Option<String>,
    balance: Option<String>,
    date_format: &str,
    yes: bool,
) -> Result<()> {
    let config = require_ai_config()?;
    let path = Path::new(file);
    let kind = detect_kind(path)?;

    let client = OpenAiClient::new(config);
    let runtime = tokio::runtime::Runtime::new()?;

    let outcome = match kind {
        StatementKind::Csv => {
            let amount_type = if withdrawal.is_some() || deposit.is_some() {
                AmountType::Separate
            } else {
                AmountType::Single
            };
            let mapping = ColumnMapping {
                date,
                description,
                amount,
                withdrawal,
                deposit,
                category,
                reference,
                balance,
                date_format: date_format.parse::<DateFormat>()?,
                amount_type,
            };
            runtime.block_on(parse_csv_file(path, &mapping, &client, &client))?
        }
        StatementKind::Pdf => runtime.block_on(parse_pdf_file(path, &client, &client))?,
    };

    if !outcome.warnings.is_empty() {
        println!("{}", format!("Skipped {} rows:", outcome.warnings.len()).yellow().bold());
        for w in &outcome.warnings {
            println!("  {w}");
        }
        println!();
    }

    if outcome.transactions.is_empty() {
        println!("No transactions found in {file}. Nothing to save.");
        return Ok(());
    }

    print_batch(&outcome);

    if !yes
        && !confirm(&format!(
            "Save {} transactions? [y/N] ",
            outcome.transactions.len()
        ))
    {
        println!("Aborted. Nothing was saved.");
        return Ok(());
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    let statement = StatementRecord {
        id: None,
        filename,
        kind: kind.as_str().to_string(),
        imported_at: None,
    };

    // The parsed batch stays in memory across save attempts; a failed
    // write never costs another parse or AI pass.
    loop {
        match save_batch(&statement, &outcome.transactions) {
            Ok(id) => {
                println!(
                    "{}",
                    format!(
                        "Saved {} transactions (statement #{id}).",
                        outcome.transactions.len()
                    )
                    .green()
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", format!("Save failed: {e}").red());
                if !confirm("Retry save? [y/N] ") {
                    return Err(e);
                }
            }
        }
    }
}

fn save_batch(statement: &StatementRecord, transactions: &[TransactionRecord]) -> Result<i64> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let mut conn = get_connection(&data_dir.join("penny.db"))?;
    init_db(&conn)?;
    save_statement(&mut conn, statement, transactions)
}

fn print_batch(outcome: &ParseOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Category", "Conf", "Flags", "Notes"]);
    for t in &outcome.transactions {
        let amt = if t.amount < 0.0 {
            money(t.amount).red().to_string()
        } else {
            money(t.amount).green().to_string()
        };
        let mut flags = Vec::new();
        if t.is_duplicate {
            flags.push("duplicate".yellow().to_string());
        }
        if t.is_suspicious {
            flags.push("suspicious".red().to_string());
        }
        let mut notes = String::new();
        if let Some(reason) = &t.ai_explanation {
            notes.push_str(reason);
        }
        if let Some(note) = &t.reconciliation_note {
            if !notes.is_empty() {
                notes.push_str("; ");
            }
            notes.push_str(note);
        }
        table.add_row(vec![
            Cell::new(&t.date),
            Cell::new(&t.description),
            Cell::new(amt),
            Cell::new(&t.category),
            Cell::new(format!("{:.0}%", t.confidence * 100.0)),
            Cell::new(flags.join(" ")),
            Cell::new(notes),
        ]);
    }
    println!("Parsed Transactions\n{table}");
}

fn confirm(label: &str) -> bool {
    print!("{label}");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
