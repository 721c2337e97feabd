//! Key-value session storage backends

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use papaya::HashMap;
use tracing::{debug, warn};

/// Default location of the session file relative to the user data directory.
const SESSION_FILE_PATH: &str = "specials-admin/session.json";

/// Durable string storage for session values.
///
/// Storage is treated as always available: reads of a missing key return
/// `None`, and implementations deal with their own persistence failures.
pub trait SessionStorage: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

/// Thread-safe in-process storage using Papaya HashMap
#[derive(Clone)]
pub struct MemoryStorage {
    entries: Arc<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.pin().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.pin().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.pin().remove(key);
    }
}

/// Storage backed by a JSON object on disk.
///
/// Values are cached in memory and the whole object is rewritten after every
/// mutation. The file is deleted once the last key is removed.
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
    /// Serializes snapshot + write so the file always reflects the latest mutation
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open the storage at `path`, loading any existing values.
    ///
    /// A missing or unparsable file yields an empty storage.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = HashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(stored) => {
                    let pinned = entries.pin();
                    for (key, value) in stored {
                        pinned.insert(key, value);
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring malformed session file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file yet");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read session file");
            }
        }

        Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        }
    }

    /// `<data dir>/specials-admin/session.json`, if the platform has a data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(SESSION_FILE_PATH))
    }

    fn persist(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot: BTreeMap<String, String> = self
            .entries
            .pin()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Err(e) = write_snapshot(&self.path, &snapshot) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.pin().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.pin().insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&self, key: &str) {
        self.entries.pin().remove(key);
        self.persist();
    }
}

fn write_snapshot(path: &Path, snapshot: &BTreeMap<String, String>) -> std::io::Result<()> {
    if snapshot.is_empty() {
        return match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(snapshot).map_err(std::io::Error::other)?;

    // Tokens are credentials: staged owner-only, then renamed into place
    let staging = path.with_extension("json.tmp");
    match std::fs::remove_file(&staging) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let written = options
        .open(&staging)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&staging, path));
    if written.is_err() {
        let _ = std::fs::remove_file(&staging);
    }
    written
}
