//! EcoBot application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize logging on stderr
//! 3. Open the record store, apply the optional seed file and prepare the forum
//! 4. Wire the chat session, store, forum and identity provider into the shell
//! 5. Run the line-based REPL on stdin/stdout until `:fim` or EOF

mod cli;
mod shell;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use ecobot_chat::{ChatSession, ResponseEngine, SessionSettings};
use ecobot_core::config::EcobotConfig;
use ecobot_core::{IdentityProvider, InMemoryIdentityProvider};
use ecobot_storage::{Database, Forum, ForumRepository, RecordRepository, RecordStore};

use cli::{CliArgs, DbTarget};
use shell::{Shell, ShellOutcome};

const PROMPT: &str = "> ";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Configuration.
    let config_file = args.resolve_config_path();
    let config = EcobotConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over flag and config.
    let log_level = args.resolve_log_level(&config);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let db = match args.resolve_db_target(&config) {
        DbTarget::Memory => {
            tracing::info!("Using in-memory database");
            Database::in_memory()?
        }
        DbTarget::File(path) => Database::new(&path)?,
    };
    let db = Arc::new(db);
    let repo = RecordRepository::new(db.clone());

    if let Some(seed) = args.resolve_seed_file(&config) {
        if let Err(e) = repo.load_seed_file(&seed) {
            tracing::error!(path = %seed.display(), error = %e, "Failed to load seed file");
            return Err(e.into());
        }
    }
    tracing::info!(records = repo.count()?, "Record store ready");
    let store: Arc<dyn RecordStore> = Arc::new(repo);

    let forum_repo = ForumRepository::new(db);
    if config.storage.sample_forum {
        forum_repo.seed_sample_posts()?;
    }

    // Chat.
    let settings = SessionSettings {
        typing_delay: Duration::from_millis(args.resolve_typing_delay_ms(&config)),
        ..SessionSettings::from(&config.chat)
    };
    let engine = ResponseEngine::new().with_echo_unmatched(config.chat.echo_unmatched);
    let session = ChatSession::start(engine, settings);

    // Identity.
    let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());
    let forum = Forum::new(Arc::new(forum_repo), identity.clone());

    let shell = Shell::new(session, store, forum, identity);
    run_repl(&shell).await?;

    tracing::info!("EcoBot shutting down");
    Ok(())
}

/// Read lines from stdin and print shell output until quit or EOF.
async fn run_repl(shell: &Shell) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n\n{}", shell.greeting(), PROMPT).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            stdout.write_all(PROMPT.as_bytes()).await?;
            stdout.flush().await?;
            continue;
        }
        match shell.handle_line(&line).await {
            ShellOutcome::Print(text) => {
                stdout
                    .write_all(format!("\n{}\n\n{}", text, PROMPT).as_bytes())
                    .await?;
                stdout.flush().await?;
            }
            ShellOutcome::Quit => break,
        }
    }
    Ok(())
}
