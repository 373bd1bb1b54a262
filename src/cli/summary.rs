use anyhow::Result;
use chrono::Utc;
use clap::ValueEnum;

use habitus::config::HabitusConfig;
use habitus::history::FileHistory;
use habitus::progress::summary::format_average;

/// Where `habitus summary` reads progress from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// The SQLite sample store.
    Store,
    /// The snapshot history file.
    History,
}

/// Print per-task averages over the trailing `days` days.
pub fn summary(config: &HabitusConfig, days: Option<u32>, source: Source) -> Result<()> {
    let days = days.unwrap_or(config.summary.default_days);
    let now = Utc::now();

    let results = match source {
        Source::Store => {
            let conn = habitus::db::open_database(config.resolved_db_path())?;
            habitus::progress::store::summarize_store(&conn, days, now)?
        }
        Source::History => {
            let history = FileHistory::new(config.resolved_history_path());
            habitus::history::summarize_history(&history, days, now)?
        }
    };

    if results.is_empty() {
        println!("No data for the selected period.");
        return Ok(());
    }

    println!("Summary (Last {days} Days)");
    println!("{}", "=".repeat(40));
    for r in &results {
        println!(
            "  {:<28} Avg {}/10 ({}%)",
            r.task,
            format_average(r.average),
            r.percent()
        );
    }

    Ok(())
}
