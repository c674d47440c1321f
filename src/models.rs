/// Statement kind, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Csv,
    Pdf,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Csv => "csv",
            StatementKind::Pdf => "pdf",
        }
    }
}

/// Bounded look at a CSV file: the header row plus the first few data rows.
#[derive(Debug, Clone)]
pub struct RawPreview {
    pub path: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Intermediate representation from the row normalizer, before the AI
/// passes fill in category and flags.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub balance: Option<f64>,
}

/// A fully processed transaction, ready to show and save.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub confidence: f64,
    pub ai_explanation: Option<String>,
    pub reference: Option<String>,
    pub balance: Option<f64>,
    pub is_duplicate: bool,
    pub is_suspicious: bool,
    pub reconciliation_note: Option<String>,
}

/// Result of running one statement file through the pipeline.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub transactions: Vec<TransactionRecord>,
    pub warnings: Vec<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StatementRecord {
    pub id: Option<i64>,
    pub filename: String,
    pub kind: String,
    pub imported_at: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub source: String,
    pub statement_id: Option<i64>,
}

/// The fixed category set. Every saved transaction carries one of these.
pub const CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Income",
    "Other",
];

/// Snap a free-form label onto the fixed category set. Unknown labels
/// become "Other".
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    for cat in CATEGORIES {
        if cat.eq_ignore_ascii_case(trimmed) {
            return (*cat).to_string();
        }
    }
    "Other".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category_exact() {
        assert_eq!(normalize_category("Food"), "Food");
        assert_eq!(normalize_category("Income"), "Income");
    }

    #[test]
    fn test_normalize_category_case_and_whitespace() {
        assert_eq!(normalize_category("FOOD"), "Food");
        assert_eq!(normalize_category(" bills "), "Bills");
        assert_eq!(normalize_category("entertainment"), "Entertainment");
    }

    #[test]
    fn test_normalize_category_unknown() {
        assert_eq!(normalize_category("Utilities"), "Other");
        assert_eq!(normalize_category("groceries"), "Other");
        assert_eq!(normalize_category(""), "Other");
    }
}
