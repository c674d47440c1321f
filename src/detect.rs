use std::path::Path;

use crate::error::{PennyError, Result};
use crate::models::{RawPreview, StatementKind};

/// Number of data rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Detect the statement kind from the file extension.
pub fn detect_kind(path: &Path) -> Result<StatementKind> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext.eq_ignore_ascii_case("csv") {
        Ok(StatementKind::Csv)
    } else if ext.eq_ignore_ascii_case("pdf") {
        Ok(StatementKind::Pdf)
    } else {
        Err(PennyError::UnsupportedFile(path.display().to_string()))
    }
}

/// Read the header row plus the first few data rows of a CSV statement,
/// leaving the rest of the file untouched.
pub fn preview_csv(path: &Path) -> Result<RawPreview> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|f| f.to_string()).collect(),
        None => return Err(PennyError::Other("CSV file is empty".to_string())),
    };

    let mut rows = Vec::new();
    for result in records.take(PREVIEW_ROWS) {
        let record = result?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(RawPreview {
        path: path.display().to_string(),
        headers,
        rows,
    })
}
