use std::path::Path;

use crate::ai::{Classifier, Reconciler};
use crate::error::{PennyError, Result};
use crate::mapping::ColumnMapping;
use crate::models::{normalize_category, NormalizedRow, ParseOutcome, TransactionRecord};
use crate::normalize;

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
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
    for result in records {
        let record = result?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok((headers, rows))
}

/// Categorize each row. Rows that brought their own category keep it at
/// full confidence; the rest are sent to the classifier one at a time, in
/// row order. Free-form labels are snapped onto the fixed category set.
async fn classify_rows(
    rows: Vec<NormalizedRow>,
    classifier: &dyn Classifier,
) -> Vec<TransactionRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let (category, confidence, ai_explanation) = match row.category.as_deref() {
            Some(label) => (normalize_category(label), 1.0, None),
            None => {
                let c = classifier.classify(&row).await;
                (normalize_category(&c.category), c.confidence, c.explanation)
            }
        };
        out.push(TransactionRecord {
            date: row.date,
            description: row.description,
            amount: row.amount,
            category,
            confidence,
            ai_explanation,
            reference: row.reference,
            balance: row.balance,
            is_duplicate: false,
            is_suspicious: false,
            reconciliation_note: None,
        });
    }
    out
}

/// One reconciliation pass over the whole batch, merged back by index.
async fn reconcile_batch(
    mut transactions: Vec<TransactionRecord>,
    reconciler: &dyn Reconciler,
) -> Vec<TransactionRecord> {
    let flags = reconciler.reconcile(&transactions).await;
    for (index, t) in transactions.iter_mut().enumerate() {
        t.is_duplicate = flags.duplicates.iter().any(|pair| pair.contains(&index));
        t.is_suspicious = flags.suspicious.contains(&index);
        t.reconciliation_note = flags.explanations.get(&index.to_string()).cloned();
    }
    transactions
}

/// Run a CSV statement through the pipeline: normalize under the mapping,
/// classify, reconcile. Fails with the collected row warnings when not a
/// single row survives normalization.
pub async fn parse_csv_file(
    path: &Path,
    mapping: &ColumnMapping,
    classifier: &dyn Classifier,
    reconciler: &dyn Reconciler,
) -> Result<ParseOutcome> {
    let (headers, rows) = read_csv(path)?;
    let resolved = mapping.resolve(&headers)?;
    let (normalized, warnings) = normalize::normalize_rows(&rows, &resolved);
    if normalized.is_empty() {
        return Err(PennyError::NoValidRows(warnings));
    }
    let transactions = classify_rows(normalized, classifier).await;
    let transactions = reconcile_batch(transactions, reconciler).await;
    Ok(ParseOutcome {
        transactions,
        warnings,
    })
}

/// Run a PDF statement through the pipeline. Non-qualifying lines are
/// dropped without warnings, and an empty result is not an error.
pub async fn parse_pdf_file(
    path: &Path,
    classifier: &dyn Classifier,
    reconciler: &dyn Reconciler,
) -> Result<ParseOutcome> {
    let text =
        pdf_extract::extract_text(path).map_err(|e| PennyError::PdfExtract(e.to_string()))?;
    let rows = normalize::extract_pdf_rows(&text)?;
    let transactions = classify_rows(rows, classifier).await;
    let transactions = reconcile_batch(transactions, reconciler).await;
    Ok(ParseOutcome {
        transactions,
        warnings: Vec::new(),
    })
}
