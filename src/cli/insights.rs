use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::ai::OpenAiClient;
use crate::db::{get_connection, list_transactions};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{get_data_dir, require_ai_config};

pub fn run() -> Result<()> {
    let config = require_ai_config()?;
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let transactions = list_transactions(&conn, None)?;

    if transactions.is_empty() {
        println!("No transactions to analyze. Import a statement first.");
        return Ok(());
    }

    println!("Analyzing {} transactions...", transactions.len());
    let client = OpenAiClient::new(config);
    let runtime = tokio::runtime::Runtime::new()?;
    let analysis = runtime.block_on(client.analyze_spending(&transactions));

    let empty = analysis.top_categories.is_empty()
        && analysis.trends.is_empty()
        && analysis.patterns.is_empty()
        && analysis.opportunities.is_empty()
        && analysis.recommendations.is_empty();
    if empty {
        println!(
            "{}",
            "No insights available. The AI request failed or returned nothing.".yellow()
        );
        return Ok(());
    }

    if !analysis.top_categories.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Amount", "%"]);
        for c in &analysis.top_categories {
            table.add_row(vec![
                Cell::new(&c.category),
                Cell::new(money(c.amount)),
                Cell::new(format!("{:.1}%", c.percentage)),
            ]);
        }
        println!("\nTop Spending Categories\n{table}");
    }

    if !analysis.trends.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Total", "Change"]);
        for t in &analysis.trends {
            table.add_row(vec![
                Cell::new(&t.month),
                Cell::new(money(t.total)),
                Cell::new(format!("{:+.1}%", t.change)),
            ]);
        }
        println!("\nMonthly Trends\n{table}");
    }

    if !analysis.patterns.is_empty() {
        println!("\n{}", "Spending Patterns".bold());
        for p in &analysis.patterns {
            if p.severity.is_empty() {
                println!("  - {}", p.description);
            } else {
                println!("  - [{}] {}", p.severity, p.description);
            }
        }
    }

    if !analysis.opportunities.is_empty() {
        println!("\n{}", "Savings Opportunities".bold());
        for o in &analysis.opportunities {
            println!(
                "  - {} (potential savings: {})",
                o.description,
                money(o.potential_savings)
            );
        }
    }

    if !analysis.recommendations.is_empty() {
        println!("\n{}", "Budget Recommendations".bold());
        for r in &analysis.recommendations {
            println!(
                "  - {}: spending {}, recommended {}. {}",
                r.category,
                money(r.current_spending),
                money(r.recommended_spending),
                r.advice
            );
        }
    }

    Ok(())
}
