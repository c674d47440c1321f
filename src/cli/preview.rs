use std::path::Path;

use comfy_table::{Cell, Table};

use crate::detect::{detect_kind, preview_csv, PREVIEW_ROWS};
use crate::error::{PennyError, Result};
use crate::fmt::money;
use crate::models::StatementKind;
use crate::normalize::extract_pdf_rows;
use crate::settings::require_ai_config;

pub fn run(file: &str) -> Result<()> {
    require_ai_config()?;
    let path = Path::new(file);

    match detect_kind(path)? {
        StatementKind::Csv => {
            let preview = preview_csv(path)?;
            println!("Format: CSV");
            let mut table = Table::new();
            table.set_header(preview.headers.clone());
            for row in &preview.rows {
                table.add_row(row.clone());
            }
            println!("{table}");
            println!();
            println!("Showing up to {PREVIEW_ROWS} rows. Map columns with `penny import`.");
        }
        StatementKind::Pdf => {
            let text = pdf_extract::extract_text(path)
                .map_err(|e| PennyError::PdfExtract(e.to_string()))?;
            let rows = extract_pdf_rows(&text)?;
            println!("Format: PDF");
            let mut table = Table::new();
            table.set_header(vec!["Date", "Description", "Amount"]);
            for row in rows.iter().take(PREVIEW_ROWS) {
                table.add_row(vec![
                    Cell::new(&row.date),
                    Cell::new(&row.description),
                    Cell::new(money(row.amount)),
                ]);
            }
            println!("{table}");
            println!();
            println!("{} transaction lines found.", rows.len());
        }
    }
    Ok(())
}
