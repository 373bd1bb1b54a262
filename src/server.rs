//! HTTP server startup.
//!
//! [`serve`] opens the database and history file, builds the [`AppState`], and
//! runs the axum router until ctrl-c.

use std::sync::Arc;

use anyhow::Result;

use crate::api::{self, AppState};
use crate::config::HabitusConfig;
use crate::db;
use crate::history::{FileHistory, HistoryProvider};

/// Open storage and build the shared handler state.
pub fn setup_shared_state(config: &HabitusConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let history_path = config.resolved_history_path();
    let history: Arc<dyn HistoryProvider> = Arc::new(FileHistory::new(&history_path));
    tracing::info!(history = %history_path.display(), "history ready");

    tracing::info!(
        endpoint = %config.assistant.endpoint,
        model = %config.assistant.model,
        "assistant configured"
    );

    AppState::new(conn, history, config)
}

/// Start the HTTP server on the configured host and port.
pub async fn serve(config: HabitusConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting habitus server");

    let state = setup_shared_state(&config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down server");
        })
        .await?;

    Ok(())
}
