use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, require_ai_config, save_settings};

pub fn run(data_dir: Option<String>, model: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(m) = model {
        settings.openai_model = m;
    }
    save_settings(&settings)?;

    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("penny.db");
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    println!("{}", "Penny is ready.".green().bold());
    println!("Data dir:  {}", data_dir.display());
    println!("Database:  {}", db_path.display());
    println!("Model:     {}", settings.openai_model);
    if require_ai_config().is_err() {
        println!();
        println!("Set OPENAI_API_KEY to enable preview, import and insights.");
    }
    Ok(())
}
