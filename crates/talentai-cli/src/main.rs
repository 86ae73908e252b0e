//! TalentAI - command-line client for the TalentAI Pro recruiting API.
//!
//! Keeps the session in the local cache directory (or the OS keychain)
//! and reports when the backend ends it.

mod commands;

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use talentai_core::{
    ApiClient, Config, FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionEvent,
    SessionStore,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;

/// Directory for a daily-rolling log file; unset logs to stderr only
const ENV_LOG_DIR: &str = "TALENTAI_LOG_DIR";

/// `keyring` keeps tokens in the OS keychain instead of the cache directory
const ENV_SESSION_STORE: &str = "TALENTAI_SESSION_STORE";

const LOG_FILE_NAME: &str = "talentai.log";

/// Daily-rolling log file writer. Lines are buffered until the guard drops.
fn file_writer(dir: &Path) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_NAME))
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => {
            let (writer, guard) = file_writer(Path::new(&dir));
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match std::env::var(ENV_SESSION_STORE).as_deref() {
        Ok("keyring") => Ok(Arc::new(KeyringSessionStore::new())),
        _ => Ok(Arc::new(FileSessionStore::new(config.cache_dir()?))),
    }
}

/// Tell the user about session changes the command caused.
fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Expired { .. }) => {
                eprintln!("Your session has expired. Run `talentai login` to sign in again.");
            }
            Ok(event) => debug!(?event, "Session event"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let mut config = Config::load()?;

    if !command.needs_client() {
        // Offline commands never send a request; skip touching stored credentials
        let client = ApiClient::new(config.client_config(), Arc::new(MemorySessionStore::new()))?;
        return commands::run(command, &client, &mut config).await;
    }

    let client_config = config.client_config();
    info!(base_url = %client_config.base_url, "TalentAI starting");
    let client = ApiClient::new(client_config, session_store(&config)?)?;
    let mut events = client.subscribe();

    let result = commands::run(command, &client, &mut config).await;
    report_session_events(&mut events);
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let log_guard = init_tracing();

    let result = run().await;
    if let Err(ref e) = result {
        eprintln!("Error: {:#}", e);
    }

    // Flush the log file before exiting
    drop(log_guard);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("talentai-log-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn read_logs(dir: &Path) -> String {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| std::fs::read_to_string(entry.unwrap().path()).ok())
            .collect()
    }

    #[test]
    fn test_dropping_guard_flushes_log_file() {
        let dir = temp_log_dir("flush");
        std::fs::create_dir_all(&dir).unwrap();
        let (writer, guard) = file_writer(&dir);
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(writer)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("request failed: connection refused");
        });
        drop(guard);

        assert!(read_logs(&dir).contains("request failed: connection refused"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
