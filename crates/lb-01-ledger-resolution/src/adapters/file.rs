//! JSON-file ledger and preference stores.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/ledgers.json         { "version": 1, "ledgers": [...] }
//! <data_dir>/ui_preferences.json  { "selected_ledger_id": "..." }
//! <data_dir>/.lock                fs2 exclusive lock held during writes
//! ```
//!
//! A missing file reads as empty. Writes go to a temp file and are renamed
//! into place while the lock is held.

use crate::ports::outbound::{LedgerRepository, PreferenceStore};
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use shared_types::{Ledger, LedgerId, StoreError, UiPreferences};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, warn};

pub const LEDGERS_FILE: &str = "ledgers.json";
pub const PREFERENCES_FILE: &str = "ui_preferences.json";
const LOCK_FILE: &str = ".lock";
const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    version: u32,
    #[serde(default)]
    ledgers: Vec<Ledger>,
}

/// Run `f` while holding the exclusive lock for `data_dir`.
fn with_lock<T>(data_dir: &Path, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
    fs::create_dir_all(data_dir)?;
    let lock_file = fs::File::create(data_dir.join(LOCK_FILE))?;
    lock_file.lock_exclusive()?;

    let result = f();

    let _ = lock_file.unlock();
    result
}

fn read_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&contents).map_err(|e| StoreError::Corrupted {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Ledger table persisted as one JSON document.
pub struct JsonFileLedgerRepository {
    data_dir: PathBuf,
}

impl JsonFileLedgerRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(LEDGERS_FILE)
    }

    fn load(&self) -> Result<LedgerDocument, StoreError> {
        let doc: LedgerDocument = read_json(&self.path())?;
        if doc.version > DOCUMENT_VERSION {
            warn!(
                "[lb-01] {} has version {}, newer than supported {}",
                self.path().display(),
                doc.version,
                DOCUMENT_VERSION
            );
        }
        Ok(doc)
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<Ledger>) -> Result<(), StoreError>) -> Result<(), StoreError> {
        with_lock(&self.data_dir, || {
            let mut doc = self.load()?;
            f(&mut doc.ledgers)?;
            doc.version = DOCUMENT_VERSION;
            write_json(&self.path(), &doc)
        })
    }
}

#[async_trait]
impl LedgerRepository for JsonFileLedgerRepository {
    async fn get_user_ledgers(&self, user_id: &str) -> Result<Vec<Ledger>, StoreError> {
        let doc = self.load()?;
        Ok(doc
            .ledgers
            .into_iter()
            .filter(|l| l.is_owned_by(user_id))
            .collect())
    }

    async fn insert_ledger(&self, ledger: Ledger) -> Result<(), StoreError> {
        debug!("[lb-01] Writing new ledger {} to {}", ledger.id, self.path().display());
        self.modify(|ledgers| {
            if ledgers.iter().any(|l| l.id == ledger.id) {
                return Err(StoreError::Duplicate(ledger.id.clone()));
            }
            ledgers.push(ledger);
            Ok(())
        })
    }

    async fn update_ledger(&self, ledger: Ledger) -> Result<(), StoreError> {
        self.modify(|ledgers| {
            let slot = ledgers
                .iter_mut()
                .find(|l| l.id == ledger.id)
                .ok_or_else(|| StoreError::NotFound(ledger.id.clone()))?;
            *slot = ledger;
            Ok(())
        })
    }

    async fn delete_ledger(&self, ledger_id: &str) -> Result<(), StoreError> {
        self.modify(|ledgers| {
            let before = ledgers.len();
            ledgers.retain(|l| l.id != ledger_id);
            if ledgers.len() == before {
                return Err(StoreError::NotFound(ledger_id.to_string()));
            }
            Ok(())
        })
    }
}

/// Preference cell persisted as a JSON document.
///
/// Reads always go to disk, so another process writing the same file is
/// observed on the next `get_ui_preferences`. Subscribers only see writes
/// made through this instance.
pub struct JsonFilePreferenceStore {
    data_dir: PathBuf,
    tx: watch::Sender<UiPreferences>,
}

impl JsonFilePreferenceStore {
    /// Open the store, loading the current value for subscribers.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let current: UiPreferences = read_json(&data_dir.join(PREFERENCES_FILE))?;
        let (tx, _rx) = watch::channel(current);
        Ok(Self { data_dir, tx })
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn get_ui_preferences(&self) -> Result<UiPreferences, StoreError> {
        read_json(&self.path())
    }

    async fn update_selected_ledger_id(
        &self,
        ledger_id: Option<LedgerId>,
    ) -> Result<(), StoreError> {
        let prefs = UiPreferences {
            selected_ledger_id: ledger_id,
        };
        with_lock(&self.data_dir, || write_json(&self.path(), &prefs))?;
        self.tx.send_replace(prefs);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<UiPreferences> {
        self.tx.subscribe()
    }
}
