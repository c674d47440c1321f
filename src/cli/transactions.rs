use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::{get_connection, list_transactions};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::get_data_dir;

pub fn run(limit: Option<i64>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let rows = list_transactions(&conn, limit)?;

    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount", "Category", "Source"]);
    for r in &rows {
        let amt = if r.amount < 0.0 {
            money(r.amount).red().to_string()
        } else {
            money(r.amount).green().to_string()
        };
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.date),
            Cell::new(&r.description),
            Cell::new(amt),
            Cell::new(&r.category),
            Cell::new(&r.source),
        ]);
    }
    let net: f64 = rows.iter().map(|r| r.amount).sum();
    println!("Transactions ({}, net: {})\n{table}", rows.len(), money(net));
    Ok(())
}
