use anyhow::Result;

use habitus::assistant::Assistant;
use habitus::config::HabitusConfig;
use habitus::history::FileHistory;

/// Ask the assistant one question and print the answer (or the fallback text).
pub async fn chat(config: &HabitusConfig, question: &str) -> Result<()> {
    anyhow::ensure!(!question.trim().is_empty(), "question must not be empty");

    let history = FileHistory::new(config.resolved_history_path());
    let tasks = config.board.tasks.iter().map(|t| t.name.clone()).collect();
    let assistant = Assistant::new(&config.assistant, tasks)?;

    let recent = assistant.recent_history(&history);
    let answer = assistant.reply(question.trim(), recent).await;
    println!("{answer}");
    Ok(())
}
