use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{load_settings, require_ai_config, settings_file_exists};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("penny.db");

    if !settings_file_exists() {
        println!("No settings file found; using defaults. Run `penny init` to save them.");
        println!();
    }

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Model:      {}", settings.openai_model);
    let key = if require_ai_config().is_ok() {
        "set"
    } else {
        "missing (set OPENAI_API_KEY)"
    };
    println!("AI key:     {key}");

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let statements: i64 =
            conn.query_row("SELECT count(*) FROM statements", [], |r| r.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;

        println!();
        println!("Statements:    {statements}");
        println!("Transactions:  {transactions}");
    } else {
        println!();
        println!("Database not found. Run `penny init` to set up.");
    }

    Ok(())
}
