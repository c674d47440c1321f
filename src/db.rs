use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{StatementRecord, StoredTransaction, TransactionRecord};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS statements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    type TEXT NOT NULL,
    imported_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT,
    source TEXT,
    statement_id INTEGER,
    FOREIGN KEY (statement_id) REFERENCES statements(id)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Save one accepted batch: the statement row plus every transaction,
/// inside a single SQL transaction. Either the whole batch lands or none
/// of it does. Returns the new statement id.
pub fn save_statement(
    conn: &mut Connection,
    statement: &StatementRecord,
    transactions: &[TransactionRecord],
) -> Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO statements (filename, type) VALUES (?1, ?2)",
        rusqlite::params![statement.filename, statement.kind],
    )?;
    let statement_id = tx.last_insert_rowid();
    for t in transactions {
        tx.execute(
            "INSERT INTO transactions (date, description, amount, category, source, statement_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![t.date, t.description, t.amount, t.category, statement.kind, statement_id],
        )?;
    }
    tx.commit()?;
    Ok(statement_id)
}

/// Stored transactions, newest date first. Within a date, later inserts
/// come first. A negative or absent limit returns everything.
pub fn list_transactions(conn: &Connection, limit: Option<i64>) -> Result<Vec<StoredTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, COALESCE(category, 'Other'), COALESCE(source, ''),
                statement_id
         FROM transactions ORDER BY date DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit.unwrap_or(-1)], |row| {
            Ok(StoredTransaction {
                id: row.get(0)?,
                date: row.get(1)?,
                description: row.get(2)?,
                amount: row.get(3)?,
                category: row.get(4)?,
                source: row.get(5)?,
                statement_id: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn txn(date: &str, description: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            date: date.to_string(),
            description: description.to_string(),
            amount,
            category: "Other".to_string(),
            confidence: 1.0,
            ai_explanation: None,
            reference: None,
            balance: None,
            is_duplicate: false,
            is_suspicious: false,
            reconciliation_note: None,
        }
    }

    fn statement(filename: &str) -> StatementRecord {
        StatementRecord {
            id: None,
            filename: filename.to_string(),
            kind: "csv".to_string(),
            imported_at: None,
        }
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["statements", "transactions"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_save_statement_links_transactions() {
        let (_dir, mut conn) = test_db();
        let id = save_statement(
            &mut conn,
            &statement("jan.csv"),
            &[txn("2024-01-02", "COFFEE", -4.5), txn("2024-01-03", "SALARY", 2000.0)],
        )
        .unwrap();

        let linked: i64 = conn
            .query_row(
                "SELECT count(*) FROM transactions WHERE statement_id = ?1",
                [id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(linked, 2);

        let (filename, kind): (String, String) = conn
            .query_row("SELECT filename, type FROM statements WHERE id = ?1", [id], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(filename, "jan.csv");
        assert_eq!(kind, "csv");

        let imported_at: Option<String> = conn
            .query_row("SELECT imported_at FROM statements WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();
        assert!(imported_at.is_some());
    }

    #[test]
    fn test_save_statement_stamps_source() {
        let (_dir, mut conn) = test_db();
        let mut st = statement("feb.pdf");
        st.kind = "pdf".to_string();
        save_statement(&mut conn, &st, &[txn("2024-02-01", "RENT", -1200.0)]).unwrap();
        let source: String = conn
            .query_row("SELECT source FROM transactions LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(source, "pdf");
    }

    #[test]
    fn test_save_statement_rolls_back_on_failure() {
        let (_dir, mut conn) = test_db();
        conn.execute_batch("DROP TABLE transactions").unwrap();
        let result = save_statement(&mut conn, &statement("bad.csv"), &[txn("2024-01-01", "X", 1.0)]);
        assert!(result.is_err());
        let statements: i64 = conn
            .query_row("SELECT count(*) FROM statements", [], |r| r.get(0))
            .unwrap();
        assert_eq!(statements, 0, "statement row should not survive a failed batch");
    }

    #[test]
    fn test_list_transactions_newest_first() {
        let (_dir, mut conn) = test_db();
        save_statement(
            &mut conn,
            &statement("a.csv"),
            &[txn("2024-01-05", "FIRST", 1.0), txn("2024-01-20", "SECOND", 2.0)],
        )
        .unwrap();
        save_statement(&mut conn, &statement("b.csv"), &[txn("2024-01-20", "THIRD", 3.0)]).unwrap();

        let rows = list_transactions(&conn, None).unwrap();
        let descriptions: Vec<&str> = rows.iter().map(|t| t.description.as_str()).collect();
        // Same-date rows: the later insert wins the tie.
        assert_eq!(descriptions, vec!["THIRD", "SECOND", "FIRST"]);
    }

    #[test]
    fn test_list_transactions_limit() {
        let (_dir, mut conn) = test_db();
        save_statement(
            &mut conn,
            &statement("a.csv"),
            &[txn("2024-01-05", "OLD", 1.0), txn("2024-01-20", "NEW", 2.0)],
        )
        .unwrap();

        let rows = list_transactions(&conn, Some(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "NEW");
    }

    #[test]
    fn test_list_transactions_empty() {
        let (_dir, conn) = test_db();
        assert!(list_transactions(&conn, None).unwrap().is_empty());
    }
}
