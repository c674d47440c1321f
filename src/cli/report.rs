use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{PennyError, Result};
use crate::fmt::money;
use crate::reports;
use crate::settings::get_data_dir;

fn parse_month_opt(month: &Option<String>) -> Result<(Option<i32>, Option<u32>)> {
    let Some(m) = month else {
        return Ok((None, None));
    };
    let parts: Vec<&str> = m.split('-').collect();
    if parts.len() == 2 {
        if let (Ok(year), Ok(month)) = (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
            if (1..=12).contains(&month) {
                return Ok((Some(year), Some(month)));
            }
        }
    }
    Err(PennyError::Other(format!(
        "--month must be in yyyy-mm format: {m}"
    )))
}

pub fn breakdown(
    month: Option<String>,
    year: Option<i32>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let (my, mm) = parse_month_opt(&month)?;
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let data = reports::get_category_breakdown(
        &conn,
        year.or(my),
        mm,
        from_date.as_deref(),
        to_date.as_deref(),
    )?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Spent", "%", "Count"]);
    for item in &data.spending {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(money(item.total.abs())),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(data.total_spent.abs())),
        Cell::new(""),
        Cell::new(""),
    ]);
    println!("Category Breakdown\n{table}");

    println!();
    println!("Income: {}   Net: {}", money(data.total_income), money(data.net));
    Ok(())
}

pub fn flow(month: Option<String>, year: Option<i32>) -> Result<()> {
    let (my, mm) = parse_month_opt(&month)?;
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let months = reports::get_monthly_flow(&conn, year.or(my), mm)?;

    if months.is_empty() {
        println!("No transactions found for that period.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Inflows", "Outflows", "Net", "Running"]);
    for m in &months {
        let net_str = if m.net >= 0.0 {
            money(m.net).green().to_string()
        } else {
            money(m.net).red().to_string()
        };
        table.add_row(vec![
            Cell::new(&m.month),
            Cell::new(money(m.inflows)),
            Cell::new(money(m.outflows.abs())),
            Cell::new(net_str),
            Cell::new(money(m.running_balance)),
        ]);
    }
    println!("Monthly Flow\n{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_opt_accepts_yyyy_mm() {
        let parsed = parse_month_opt(&Some("2024-07".to_string())).unwrap();
        assert_eq!(parsed, (Some(2024), Some(7)));
        assert_eq!(parse_month_opt(&None).unwrap(), (None, None));
    }

    #[test]
    fn test_parse_month_opt_rejects_malformed_values() {
        for bad in ["garbage", "2024-xx", "2024", "2024-07-01", "2024-13", "xx-07"] {
            let err = parse_month_opt(&Some(bad.to_string())).unwrap_err();
            let msg = err.to_string();
            assert!(
                msg.contains("--month must be in yyyy-mm format"),
                "value {bad:?} gave: {msg}"
            );
            assert!(msg.contains(bad), "value {bad:?} missing from: {msg}");
        }
    }
}
