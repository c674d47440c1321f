use thiserror::Error;

#[derive(Error, Debug)]
pub enum PennyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Could not read PDF: {0}")]
    PdfExtract(String),

    #[error("Invalid column mapping:\n{}", .0.join("\n"))]
    InvalidMapping(Vec<String>),

    #[error("No valid transactions found. Errors:\n{}", .0.join("\n"))]
    NoValidRows(Vec<String>),

    #[error("Missing AI configuration: {}. Run `penny init` or set the environment variable.", .0.join(", "))]
    ConfigMissing(Vec<String>),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PennyError>;
