//! Motivational chat backed by a local text-generation server.
//!
//! [`Assistant::ask`] posts one non-streaming `/api/generate` request (Ollama
//! wire format) built from [`prompt::build_prompt`] and the recent history.
//! [`Assistant::reply`] is what user-facing callers use: any failure becomes the
//! fixed [`Assistant::fallback_message`]. There is no retry.
//!
//! The assistant never reads the history itself. Callers load it with
//! [`Assistant::recent_history`] (on a blocking thread when serving) and pass
//! the result in; a failed read degrades to a "no history" context.

pub mod prompt;

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;
use crate::history::{recent, HistoryProvider, Snapshot};

/// Errors from a single generation request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssistantError {
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("generation response had no text")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Client for the configured generation endpoint and model.
pub struct Assistant {
    client: Client,
    endpoint: String,
    model: String,
    context_entries: usize,
    tasks: Vec<String>,
}

impl Assistant {
    /// `tasks` are the habit names listed to the model as available.
    pub fn new(config: &AssistantConfig, tasks: Vec<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build assistant HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            context_entries: config.context_entries,
            tasks,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of trailing snapshots included in each prompt.
    pub fn context_entries(&self) -> usize {
        self.context_entries
    }

    /// The user-visible text substituted for any failed request.
    pub fn fallback_message(&self) -> String {
        format!(
            "Sorry, there was an error processing your request. Make sure Ollama is running \
             with the {} model.",
            self.model
        )
    }

    /// Read the snapshots that go into the prompt context. Blocks on provider I/O.
    pub fn recent_history(&self, history: &dyn HistoryProvider) -> anyhow::Result<Vec<Snapshot>> {
        recent(history, self.context_entries)
    }

    /// Prompt sent for `question` given the already-loaded recent history.
    pub fn prompt_for(&self, question: &str, recent: anyhow::Result<Vec<Snapshot>>) -> String {
        if let Err(e) = &recent {
            tracing::warn!(error = %format!("{e:#}"), "history unavailable for chat context");
        }
        let context = prompt::build_context(recent, Utc::now().date_naive(), &self.tasks);
        prompt::build_prompt(question, &context)
    }

    /// Ask the model and return its text.
    pub async fn ask(
        &self,
        question: &str,
        recent: anyhow::Result<Vec<Snapshot>>,
    ) -> Result<String, AssistantError> {
        let prompt = self.prompt_for(question, recent);
        self.generate(&prompt).await
    }

    /// Ask the model, substituting the fallback message on any failure.
    pub async fn reply(&self, question: &str, recent: anyhow::Result<Vec<Snapshot>>) -> String {
        match self.ask(question, recent).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    endpoint = %self.endpoint,
                    model = %self.model,
                    "assistant request failed"
                );
                self.fallback_message()
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = prompt.len(),
            "sending generate request"
        );

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::HttpStatus(status));
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .response
            .filter(|text| !text.is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }
}
