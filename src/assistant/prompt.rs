//! Prompt template and history context for the progress assistant.

use chrono::NaiveDate;

use crate::history::Snapshot;

/// First message shown in a fresh conversation.
pub const GREETING: &str = "Hello! I'm your Progress Tracker AI assistant. I can help you analyze \
your progress, suggest improvements, set goals, and provide motivation. What would you like to \
know about your progress today?";

/// Canned prompts offered next to the input box.
pub const QUICK_QUESTIONS: [&str; 5] = [
    "How is my overall progress this week?",
    "What habits should I focus on improving?",
    "Give me motivation to stay consistent",
    "Analyze my progress patterns",
    "What goals should I set for tomorrow?",
];

const NO_HISTORY_CONTEXT: &str = "Progress Tracking Context: No progress history available yet.";

/// Describe recent history for the model.
///
/// `recent` is the result of reading the history; a read failure degrades to a
/// one-line "no history" context instead of failing the request.
pub fn build_context<E>(
    recent: Result<Vec<Snapshot>, E>,
    today: NaiveDate,
    tasks: &[String],
) -> String {
    let Ok(entries) = recent else {
        return NO_HISTORY_CONTEXT.to_string();
    };

    let history = if entries.is_empty() {
        "No saved progress yet".to_string()
    } else {
        match serde_json::to_string(&entries) {
            Ok(json) => json,
            Err(_) => return NO_HISTORY_CONTEXT.to_string(),
        }
    };

    format!(
        "Progress Tracking Context:\n\
         - Recent progress history: {history}\n\
         - Current date: {}\n\
         - Available tasks: {}\n",
        today.format("%Y-%m-%d"),
        tasks.join(", ")
    )
}

/// Wrap the user's question and the context in the fixed coaching template.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful Progress Tracker AI assistant. Help users with their daily habits and \
progress tracking. Answer questions about their progress data, provide motivation, suggest \
improvements, and help them stay on track with their goals.\n\
\n\
User question: {question}\n\
\n\
Context: {context}\n\
\n\
Please provide a helpful, encouraging response focused on progress tracking and personal \
development:"
    )
}
