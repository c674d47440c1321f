use std::fmt;
use std::str::FromStr;

use crate::error::{PennyError, Result};

/// Date layout of the mapped date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

impl DateFormat {
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::YearMonthDay => "%Y-%m-%d",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            DateFormat::MonthDayYear => "MM/dd/yyyy",
            DateFormat::DayMonthYear => "dd/MM/yyyy",
            DateFormat::YearMonthDay => "yyyy-MM-dd",
        };
        write!(f, "{token}")
    }
}

impl FromStr for DateFormat {
    type Err = PennyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MM/dd/yyyy" | "MM/DD/YYYY" | "mdy" => Ok(DateFormat::MonthDayYear),
            "dd/MM/yyyy" | "DD/MM/YYYY" | "dmy" => Ok(DateFormat::DayMonthYear),
            "yyyy-MM-dd" | "YYYY-MM-DD" | "ymd" => Ok(DateFormat::YearMonthDay),
            other => Err(PennyError::Other(format!(
                "Unknown date format: {other} (expected MM/dd/yyyy, dd/MM/yyyy, or yyyy-MM-dd)"
            ))),
        }
    }
}

/// Whether the statement carries one signed amount column or separate
/// withdrawal/deposit columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountType {
    #[default]
    Single,
    Separate,
}

/// User-declared mapping from statement columns to transaction fields.
/// Column references are header names; presence is checked by `validate`
/// rather than the type system so that all violations can be reported
/// together.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub withdrawal: Option<String>,
    pub deposit: Option<String>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub balance: Option<String>,
    pub date_format: DateFormat,
    pub amount_type: AmountType,
}

/// Amount columns after resolution. Single mode carries one signed
/// column; separate mode carries both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAmount {
    Single(usize),
    Separate { withdrawal: usize, deposit: usize },
}

/// A mapping bound to a concrete header row: names resolved to indices.
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub date: usize,
    pub description: usize,
    pub amount: ResolvedAmount,
    pub category: Option<usize>,
    pub reference: Option<usize>,
    pub balance: Option<usize>,
    pub date_format: DateFormat,
}

fn name_of(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ColumnMapping {
    /// All mapping-level violations, in field order. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if name_of(&self.date).is_none() {
            violations.push("Date is required".to_string());
        }
        if name_of(&self.description).is_none() {
            violations.push("Description is required".to_string());
        }
        match self.amount_type {
            AmountType::Single => {
                if name_of(&self.amount).is_none() {
                    violations.push("Amount is required".to_string());
                }
            }
            AmountType::Separate => {
                if name_of(&self.withdrawal).is_none() || name_of(&self.deposit).is_none() {
                    violations.push("Both withdrawal and deposit columns must be mapped".to_string());
                }
            }
        }
        violations
    }

    /// Bind the mapping to a header row. Reports every violation at once:
    /// missing required fields first, then any mapped name that does not
    /// appear in the header.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedMapping> {
        let mut violations = self.validate();

        let find = |name: Option<&str>, violations: &mut Vec<String>| -> Option<usize> {
            let name = name?;
            let found = headers.iter().position(|h| h == name);
            if found.is_none() {
                violations.push(format!("column '{name}' not found in CSV header"));
            }
            found
        };

        let date = find(name_of(&self.date), &mut violations);
        let description = find(name_of(&self.description), &mut violations);
        let amount = find(name_of(&self.amount), &mut violations);
        let withdrawal = find(name_of(&self.withdrawal), &mut violations);
        let deposit = find(name_of(&self.deposit), &mut violations);
        let category = find(name_of(&self.category), &mut violations);
        let reference = find(name_of(&self.reference), &mut violations);
        let balance = find(name_of(&self.balance), &mut violations);

        let amount = match (self.amount_type, amount, withdrawal, deposit) {
            (AmountType::Single, Some(idx), _, _) => Some(ResolvedAmount::Single(idx)),
            (AmountType::Separate, _, Some(withdrawal), Some(deposit)) => {
                Some(ResolvedAmount::Separate { withdrawal, deposit })
            }
            _ => None,
        };

        match (date, description, amount, violations.is_empty()) {
            (Some(date), Some(description), Some(amount), true) => Ok(ResolvedMapping {
                date,
                description,
                amount,
                category,
                reference,
                balance,
                date_format: self.date_format,
            }),
            _ => Err(PennyError::InvalidMapping(violations)),
        }
    }
}
