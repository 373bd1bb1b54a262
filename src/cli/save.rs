use anyhow::{Context, Result};
use chrono::Utc;

use habitus::config::HabitusConfig;
use habitus::progress::types::TaskScore;

/// Parse a `TASK=SCORE` argument. The last `=` separates the score.
pub fn parse_score(arg: &str) -> Result<TaskScore> {
    let (task, score) = arg
        .rsplit_once('=')
        .with_context(|| format!("expected TASK=SCORE, got {arg:?}"))?;
    let task = task.trim();
    anyhow::ensure!(!task.is_empty(), "task name must not be empty in {arg:?}");
    let progress = score
        .trim()
        .parse::<i64>()
        .with_context(|| format!("score must be an integer in {arg:?}"))?;
    Ok(TaskScore::new(task, progress))
}

/// Append one batch from `TASK=SCORE` arguments, dated now.
pub fn save(config: &HabitusConfig, args: &[String]) -> Result<()> {
    let entries = args
        .iter()
        .map(|a| parse_score(a))
        .collect::<Result<Vec<_>>>()?;

    let db_path = config.resolved_db_path();
    let mut conn = habitus::db::open_database(&db_path)?;
    let receipt = habitus::progress::store::append_batch(&mut conn, &entries, Utc::now())?;

    println!(
        "Saved {} score(s) for {} (batch {})",
        receipt.inserted,
        receipt.date.format("%Y-%m-%d"),
        receipt.batch_id
    );
    Ok(())
}
