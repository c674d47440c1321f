use chrono::Datelike;
use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Date filter helper
// ---------------------------------------------------------------------------

fn date_filter(
    year: Option<i32>,
    month: Option<u32>,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<(String, Vec<String>)> {
    match (from_date, to_date) {
        (Some(from), Some(to)) => {
            return Ok((
                "t.date BETWEEN ?1 AND ?2".to_string(),
                vec![from.to_string(), to.to_string()],
            ));
        }
        (Some(_), None) => {
            return Err(crate::error::PennyError::Other(
                "--from requires --to (both date boundaries must be specified)".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(crate::error::PennyError::Other(
                "--to requires --from (both date boundaries must be specified)".to_string(),
            ));
        }
        (None, None) => {}
    }
    let prefix = match (year, month) {
        (Some(y), Some(m)) => format!("{y:04}-{m:02}"),
        (Some(y), None) => format!("{y}"),
        // Default: current year
        _ => format!("{}", chrono::Local::now().year()),
    };
    Ok(("t.date LIKE ?1".to_string(), vec![format!("{prefix}%")]))
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

pub struct CategoryItem {
    pub name: String,
    pub total: f64,
    pub count: i64,
    pub pct: f64,
}

pub struct CategoryReport {
    pub spending: Vec<CategoryItem>,
    pub total_spent: f64,
    pub total_income: f64,
    pub net: f64,
}

pub fn get_category_breakdown(
    conn: &Connection,
    year: Option<i32>,
    month: Option<u32>,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<CategoryReport> {
    let (clause, params) = date_filter(year, month, from_date, to_date)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();

    let sql = format!(
        "SELECT COALESCE(t.category, 'Other') as name, SUM(t.amount) as total, COUNT(*) as count \
         FROM transactions t WHERE {clause} AND t.amount < 0 \
         GROUP BY name ORDER BY total ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw: Vec<(String, f64, i64)> = stmt
        .query_map(param_values.as_slice(), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let total_spent: f64 = raw.iter().map(|(_, t, _)| t).sum();
    let spending = raw
        .iter()
        .map(|(name, t, c)| CategoryItem {
            name: name.clone(),
            total: *t,
            count: *c,
            pct: if total_spent != 0.0 { t / total_spent * 100.0 } else { 0.0 },
        })
        .collect();

    let income_sql = format!(
        "SELECT COALESCE(SUM(t.amount), 0) FROM transactions t WHERE {clause} AND t.amount > 0"
    );
    let mut istmt = conn.prepare(&income_sql)?;
    let total_income: f64 = istmt.query_row(param_values.as_slice(), |row| row.get(0))?;

    Ok(CategoryReport {
        spending,
        total_spent,
        total_income,
        net: total_income + total_spent,
    })
}

// ---------------------------------------------------------------------------
// Monthly flow
// ---------------------------------------------------------------------------

pub struct FlowMonth {
    pub month: String,
    pub inflows: f64,
    pub outflows: f64,
    pub net: f64,
    pub running_balance: f64,
}

pub fn get_monthly_flow(
    conn: &Connection,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Vec<FlowMonth>> {
    let (clause, params) = date_filter(year, month, None, None)?;

    let sql = format!(
        "SELECT substr(t.date, 1, 7) as month, \
         SUM(CASE WHEN t.amount > 0 THEN t.amount ELSE 0 END) as inflows, \
         SUM(CASE WHEN t.amount < 0 THEN t.amount ELSE 0 END) as outflows \
         FROM transactions t WHERE {clause} \
         GROUP BY substr(t.date, 1, 7) ORDER BY month"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw: Vec<(String, f64, f64)> = stmt
        .query_map([&params[0]], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut months = Vec::new();
    let mut running = 0.0f64;
    for (m, inflows, outflows) in raw {
        running += inflows + outflows;
        months.push(FlowMonth {
            month: m,
            inflows,
            outflows,
            net: inflows + outflows,
            running_balance: running,
        });
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn seed(conn: &Connection, date: &str, description: &str, amount: f64, category: &str) {
        conn.execute(
            "INSERT INTO transactions (date, description, amount, category, source) \
             VALUES (?1, ?2, ?3, ?4, 'csv')",
            rusqlite::params![date, description, amount, category],
        )
        .unwrap();
    }

    #[test]
    fn test_breakdown_groups_spending() {
        let (_dir, conn) = test_db();
        seed(&conn, "2024-01-05", "SALARY", 3000.0, "Income");
        seed(&conn, "2024-01-10", "COFFEE", -10.0, "Food");
        seed(&conn, "2024-01-12", "GROCERIES", -15.0, "Food");
        seed(&conn, "2024-02-01", "BUS PASS", -75.0, "Transport");

        let report = get_category_breakdown(&conn, Some(2024), None, None, None).unwrap();
        assert_eq!(report.spending.len(), 2);
        assert_eq!(report.total_spent, -100.0);
        assert_eq!(report.total_income, 3000.0);
        assert_eq!(report.net, 2900.0);

        // Largest spend first.
        assert_eq!(report.spending[0].name, "Transport");
        let food = report.spending.iter().find(|c| c.name == "Food").unwrap();
        assert_eq!(food.total, -25.0);
        assert_eq!(food.count, 2);
        assert_eq!(food.pct, 25.0);
    }

    #[test]
    fn test_breakdown_month_filter() {
        let (_dir, conn) = test_db();
        seed(&conn, "2024-01-10", "COFFEE", -10.0, "Food");
        seed(&conn, "2024-02-01", "BUS PASS", -75.0, "Transport");

        let report = get_category_breakdown(&conn, Some(2024), Some(1), None, None).unwrap();
        assert_eq!(report.spending.len(), 1);
        assert_eq!(report.spending[0].name, "Food");
        assert_eq!(report.total_spent, -10.0);
    }

    #[test]
    fn test_breakdown_from_to_window() {
        let (_dir, conn) = test_db();
        seed(&conn, "2024-01-10", "COFFEE", -10.0, "Food");
        seed(&conn, "2024-02-01", "BUS PASS", -75.0, "Transport");
        seed(&conn, "2024-03-20", "CINEMA", -20.0, "Entertainment");

        let report =
            get_category_breakdown(&conn, None, None, Some("2024-01-15"), Some("2024-02-28"))
                .unwrap();
        assert_eq!(report.spending.len(), 1);
        assert_eq!(report.spending[0].name, "Transport");
    }

    #[test]
    fn test_breakdown_empty_db() {
        let (_dir, conn) = test_db();
        let report = get_category_breakdown(&conn, Some(2024), None, None, None).unwrap();
        assert!(report.spending.is_empty());
        assert_eq!(report.total_spent, 0.0);
        assert_eq!(report.total_income, 0.0);
        assert_eq!(report.net, 0.0);
    }

    #[test]
    fn test_breakdown_uncategorized_counts_as_other() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO transactions (date, description, amount, source) \
             VALUES ('2024-03-01', 'MYSTERY', -5.0, 'csv')",
            [],
        )
        .unwrap();
        let report = get_category_breakdown(&conn, Some(2024), None, None, None).unwrap();
        assert_eq!(report.spending.len(), 1);
        assert_eq!(report.spending[0].name, "Other");
    }

    #[test]
    fn test_monthly_flow_running_balance() {
        let (_dir, conn) = test_db();
        seed(&conn, "2024-01-05", "SALARY", 3000.0, "Income");
        seed(&conn, "2024-01-10", "COFFEE", -25.0, "Food");
        seed(&conn, "2024-02-01", "BUS PASS", -75.0, "Transport");

        let months = get_monthly_flow(&conn, Some(2024), None).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].inflows, 3000.0);
        assert_eq!(months[0].outflows, -25.0);
        assert_eq!(months[0].net, 2975.0);
        assert_eq!(months[0].running_balance, 2975.0);
        assert_eq!(months[1].month, "2024-02");
        assert_eq!(months[1].net, -75.0);
        assert_eq!(months[1].running_balance, 2900.0);
    }

    #[test]
    fn test_date_filter_rejects_from_without_to() {
        let (_dir, conn) = test_db();
        let result = get_category_breakdown(&conn, None, None, Some("2024-01-01"), None);
        assert!(result.is_err());
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("--from requires --to"), "got: {msg}");
    }

    #[test]
    fn test_date_filter_rejects_to_without_from() {
        let (_dir, conn) = test_db();
        let result = get_category_breakdown(&conn, None, None, None, Some("2024-12-31"));
        assert!(result.is_err());
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("--to requires --from"), "got: {msg}");
    }
}
