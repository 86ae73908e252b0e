use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Session;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Single source of truth for the client's credentials.
///
/// Reads and writes are synchronous. A `set` that fails part way must never
/// leave a token from the previous session next to one from the new session;
/// at worst an access token remains with no refresh token, which callers
/// treat as anonymous.
pub trait SessionStore: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Overwrite the stored session.
    fn set(&self, session: &Session) -> Result<()>;

    /// Remove both tokens.
    fn clear(&self) -> Result<()>;

    fn session(&self) -> Option<Session> {
        Some(Session::new(self.access_token()?, self.refresh_token()?))
    }
}

#[derive(Debug, Default)]
struct Slots {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// In-process store. Counts writes and clears so callers can observe them.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: Mutex<Slots>,
    sets: AtomicUsize,
    clears: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let store = Self::default();
        {
            let mut slots = store.lock();
            slots.access_token = Some(session.access_token);
            slots.refresh_token = Some(session.refresh_token);
        }
        store
    }

    /// A store left with only an access token, as after an interrupted write.
    pub fn with_access_token_only(access_token: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().access_token = Some(access_token.into());
        store
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        // A panic while holding the lock cannot leave the slots half-written
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    fn set(&self, session: &Session) -> Result<()> {
        let mut slots = self.lock();
        slots.access_token = Some(session.access_token.clone());
        slots.refresh_token = Some(session.refresh_token.clone());
        self.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self.lock();
        slots.access_token = None;
        slots.refresh_token = None;
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    access_token: Option<String>,
    refresh_token: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Session persisted as JSON in the cache directory, surviving restarts.
pub struct FileSessionStore {
    cache_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    /// Time of the last successful `set`, if any.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.read().updated_at
    }

    /// Missing or unreadable files read as an empty session.
    fn read(&self) -> SessionFile {
        let path = self.path();
        if !path.exists() {
            return SessionFile::default();
        }
        let parsed = std::fs::read_to_string(&path)
            .context("Failed to read session file")
            .and_then(|contents| {
                serde_json::from_str(&contents).context("Failed to parse session file")
            });
        match parsed {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                SessionFile::default()
            }
        }
    }

    fn write(&self, file: &SessionFile) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        let contents = serde_json::to_string_pretty(file)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to set session file permissions")?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn access_token(&self) -> Option<String> {
        self.read().access_token
    }

    fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token
    }

    fn set(&self, session: &Session) -> Result<()> {
        self.write(&SessionFile {
            access_token: Some(session.access_token.clone()),
            refresh_token: Some(session.refresh_token.clone()),
            updated_at: Some(Utc::now()),
        })
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "talentai-store-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_store_set_overwrites() {
        let store = MemorySessionStore::with_session(Session::new("a1", "r1"));
        store.set(&Session::new("a2", "r2")).unwrap();
        assert_eq!(store.session(), Some(Session::new("a2", "r2")));
        assert_eq!(store.set_count(), 1);
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemorySessionStore::with_session(Session::new("a1", "r1"));
        store.clear().unwrap();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert_eq!(store.clear_count(), 1);
    }

    #[test]
    fn test_partial_session_is_not_a_session() {
        let store = MemorySessionStore::with_access_token_only("a1");
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert!(store.session().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_cache_dir("round-trip");
        let store = FileSessionStore::new(dir.clone());
        assert!(store.session().is_none());

        store.set(&Session::new("a1", "r1")).unwrap();
        let reopened = FileSessionStore::new(dir.clone());
        assert_eq!(reopened.session(), Some(Session::new("a1", "r1")));
        assert!(reopened.updated_at().is_some());

        reopened.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.session().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_cache_dir("perms");
        std::fs::create_dir_all(&dir).unwrap();
        // Pre-existing world-readable file gets tightened on the next write
        std::fs::write(dir.join(SESSION_FILE), "{}").unwrap();
        std::fs::set_permissions(dir.join(SESSION_FILE), std::fs::Permissions::from_mode(0o644))
            .unwrap();

        let store = FileSessionStore::new(dir.clone());
        store.set(&Session::new("a1", "r1")).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let dir = temp_cache_dir("garbage");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SESSION_FILE), "{not json").unwrap();

        let store = FileSessionStore::new(dir.clone());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_clear_without_session_succeeds() {
        let dir = temp_cache_dir("empty-clear");
        let store = FileSessionStore::new(dir);
        assert!(store.clear().is_ok());
    }
}
