//! Sage application binary - composition root.
//!
//! Ties the Sage crates into a single executable:
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Open the session database (or keep sessions in memory)
//! 3. Build the knowledge resolver over the configured providers
//! 4. Wire the orchestrator to the terminal, speech programs and browser
//! 5. Run the interactive prompt

mod browser;
mod cli;
mod repl;
mod speech;
mod terminal;

use std::sync::Arc;

use clap::Parser;
use sage_chat::{ChatOrchestrator, KnowledgeResolver};
use sage_core::config::SageConfig;
use sage_core::error::SageError;
use sage_core::persistence::{InMemoryPersistence, SessionPersistence};
use sage_storage::{Database, SessionRepository};

use crate::browser::SystemUrlOpener;
use crate::cli::CliArgs;
use crate::terminal::TerminalRenderer;

/// Logs go to stderr so they stay out of the conversation on stdout.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let loaded = SageConfig::load(&config_file);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::info!("Starting Sage v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(SageError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %config_file.display(), "No config file; using defaults")
        }
        Err(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Invalid config; using defaults")
        }
    }

    // Storage.
    let persistence: Arc<dyn SessionPersistence> = if args.ephemeral {
        tracing::info!("Ephemeral mode: sessions are not saved");
        Arc::new(InMemoryPersistence::new())
    } else {
        let data_dir = args.resolve_data_dir(&config.general.data_dir);
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
            return Err(e.into());
        }
        let db_path = data_dir.join("sage.db");
        let db = Database::new(&db_path)?;
        tracing::info!(path = %db_path.display(), "SQLite database opened");
        Arc::new(SessionRepository::new(Arc::new(db)))
    };

    // Providers.
    let resolver = KnowledgeResolver::from_config(&config.providers)?;
    tracing::info!(
        instant_answer = %config.providers.instant_answer_url,
        summary = %config.providers.summary_url,
        "Knowledge providers ready"
    );

    let orchestrator = ChatOrchestrator::new(resolver, persistence, config.chat.clone())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load chat sessions");
            e
        })?
        .with_renderer(Arc::new(TerminalRenderer::new()))
        .with_speaker(speech::build_speaker(&config.voice, args.no_speech))
        .with_listener(speech::build_listener(&config.voice))
        .with_url_opener(Arc::new(SystemUrlOpener));

    let export_path = std::env::current_dir()?.join(&config.export.file_name);
    repl::run(Arc::new(orchestrator), export_path).await?;

    tracing::info!("Sage stopped");
    Ok(())
}
