//! CLI `doctor` command: database diagnostics and a health report.

use anyhow::{Context, Result};

use habitus::config::HabitusConfig;
use habitus::db;
use habitus::history::{FileHistory, HistoryProvider};

/// Run database diagnostics and print a health report.
pub fn doctor(config: &HabitusConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `habitus serve` or `habitus save` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Habitus Health Report");
    println!("=====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Samples:         {}", report.sample_count);
    println!("  Saves:           {}", report.batch_count);
    if let Some(ref oldest) = report.oldest_sample {
        println!("  Oldest:          {oldest}");
    }
    if let Some(ref newest) = report.newest_sample {
        println!("  Newest:          {newest}");
    }
    println!();

    let history_path = config.resolved_history_path();
    match FileHistory::new(&history_path).read() {
        Ok(entries) => println!(
            "History file:      {} snapshot(s) at {}",
            entries.len(),
            history_path.display()
        ),
        Err(e) => println!("History file:      UNREADABLE ({e:#})"),
    }
    println!("Assistant:         {} @ {}", config.assistant.model, config.assistant.endpoint);
    println!();

    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Back up {} before touching it", db_path.display());
        println!("  2. Run `habitus export > samples.json` to salvage readable rows");
        println!("  3. Move the damaged database aside; the next run creates a fresh one");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
