use chrono::NaiveDate;
use regex::Regex;

use crate::error::Result;
use crate::mapping::{ResolvedAmount, ResolvedMapping};
use crate::models::NormalizedRow;

/// Canonical date layout for everything downstream of normalization.
pub const CANONICAL_DATE: &str = "%Y-%m-%d";

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Drop every character that is not a digit, dot or minus sign.
/// `"$1,234.56"` becomes `"1234.56"`; `"(42.00)"` becomes `"42.00"`.
fn strip_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Lenient amount parse for withdrawal/deposit columns: empty or
/// unparseable cells count as zero.
fn parse_or_zero(raw: &str) -> f64 {
    let stripped = strip_amount(raw);
    if stripped.is_empty() {
        return 0.0;
    }
    stripped.parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// CSV rows
// ---------------------------------------------------------------------------

/// Normalize raw CSV data rows under a resolved mapping.
///
/// Returns the surviving rows plus one warning per skipped row. Rows are
/// numbered from 1 in file order, header excluded. A row is skipped when a
/// required cell is blank after trimming, its date does not parse under the
/// declared format, or (in single-amount mode) its amount is missing or
/// malformed.
pub fn normalize_rows(
    rows: &[Vec<String>],
    mapping: &ResolvedMapping,
) -> (Vec<NormalizedRow>, Vec<String>) {
    let mut out = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let n = index + 1;

        let date_str = cell(row, mapping.date).trim();
        let description = cell(row, mapping.description).trim();
        if date_str.is_empty() || description.is_empty() {
            warnings.push(format!("Row {n}: Missing required fields"));
            continue;
        }

        let date = match NaiveDate::parse_from_str(date_str, mapping.date_format.chrono_format()) {
            Ok(d) => d.format(CANONICAL_DATE).to_string(),
            Err(_) => {
                warnings.push(format!("Row {n}: Invalid date format - {date_str}"));
                continue;
            }
        };

        let amount = match mapping.amount {
            ResolvedAmount::Single(idx) => {
                let stripped = strip_amount(cell(row, idx));
                if stripped.is_empty() {
                    warnings.push(format!("Row {n}: Missing amount"));
                    continue;
                }
                match stripped.parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        warnings.push(format!("Row {n}: Invalid amount"));
                        continue;
                    }
                }
            }
            ResolvedAmount::Separate { withdrawal, deposit } => {
                parse_or_zero(cell(row, deposit)) - parse_or_zero(cell(row, withdrawal))
            }
        };

        let category = mapping
            .category
            .map(|idx| cell(row, idx).trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let reference = mapping
            .reference
            .map(|idx| cell(row, idx).trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let balance = mapping.balance.and_then(|idx| {
            strip_amount(cell(row, idx)).parse::<f64>().ok()
        });

        out.push(NormalizedRow {
            date,
            description: description.to_string(),
            amount,
            category,
            reference,
            balance,
        });
    }

    (out, warnings)
}

// ---------------------------------------------------------------------------
// PDF text
// ---------------------------------------------------------------------------

/// Pull transaction candidates out of extracted PDF text.
///
/// A line qualifies when it contains both a dd/MM/yyyy-shaped date and a
/// decimal amount with two fraction digits (optionally `$`-prefixed). The
/// description is the line with the first occurrence of each removed.
/// Lines that do not qualify, or whose date is not a real calendar date,
/// are dropped without a warning.
pub fn extract_pdf_rows(text: &str) -> Result<Vec<NormalizedRow>> {
    let date_re = Regex::new(r"\d{2}/\d{2}/\d{4}")?;
    let amount_re = Regex::new(r"\$?\d+\.\d{2}")?;

    let mut out = Vec::new();
    for line in text.lines() {
        let (Some(date_m), Some(amount_m)) = (date_re.find(line), amount_re.find(line)) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_m.as_str(), "%d/%m/%Y") else {
            continue;
        };

        let without_date = date_re.replacen(line, 1, "");
        let without_amount = amount_re.replacen(without_date.as_ref(), 1, "");
        let amount: f64 = amount_m
            .as_str()
            .trim_start_matches('$')
            .parse()
            .unwrap_or(0.0);

        out.push(NormalizedRow {
            date: date.format(CANONICAL_DATE).to_string(),
            description: without_amount.trim().to_string(),
            amount,
            category: None,
            reference: None,
            balance: None,
        });
    }
    Ok(out)
}
